use serde_json::Value;

/// Reshapes a merged raw profile record.
pub trait ProfileNormalizer: Send + Sync {
    fn normalize_profile(&self, raw: &Value) -> Value;
}

/// Reshapes one raw company element.
pub trait CompanyNormalizer: Send + Sync {
    fn normalize_company(&self, raw: &Value) -> Value;
}
