//! Query-string encoding for the Voyager protocol
//!
//! The backend parses a Rest.li-style list syntax (`List(a,b,c)`) that breaks
//! under standard URI encoding, so list values and scalar values are encoded
//! differently:
//!
//! | Value | Rendering | Escaping |
//! |-------|-----------|----------|
//! | [`QueryValue::List`] | `List(a,b,c)` | everything but `A-Za-z0-9-_.~`, so `!'()*` included |
//! | [`QueryValue::Scalar`] | as-is | same set, except literal `,` is preserved |

pub mod encoding;

pub use encoding::{append_query, decode_query, encode_list_value, encode_query, encode_scalar};

pub use voyager_domain::{QueryMap, QueryValue};
