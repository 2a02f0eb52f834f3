use serde_json::{json, Value};
use voyager_domain::utils::{extract_root_domain, scrub_id_from_urn};

use super::fields::{image_path, or_default, scalar_text, text};
use super::ports::CompanyNormalizer;

/// Flattens an `organization/companies` element into a company record.
///
/// Elements without a `name` are returned untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedInCompanyNormalizer;

impl CompanyNormalizer for LinkedInCompanyNormalizer {
    fn normalize_company(&self, raw: &Value) -> Value {
        if text(raw, "/name").is_empty() {
            return raw.clone();
        }

        let page_url = text(raw, "/companyPageUrl");
        let mut company = json!({
            "source": "linkedin",
            "name": text(raw, "/name"),
            "universalName": text(raw, "/universalName"),
            "description": text(raw, "/description"),
            "type": text(raw, "/companyType/localizedName"),
            "pageUrl": page_url,
            "domain": extract_root_domain(&page_url),
            "linkedInPageUrl": text(raw, "/url"),
            "companyUrn": text(raw, "/entityUrn"),
            "companyId": scrub_id_from_urn(&text(raw, "/entityUrn")),
            "parentCompanyId": scrub_id_from_urn(&text(raw, "/parentCompany")),
            "affiliatedCompanies": or_default(raw, "/affiliatedCompanies", json!([])),
            "confirmedLocations": or_default(raw, "/confirmedLocations", json!([])),
            "specialities": or_default(raw, "/specialities", json!([])),
            "staffCountRange": or_default(raw, "/staffCountRange", json!({})),
        });

        if raw.get("foundedOn").is_some() {
            company["foundedOn"] = Value::String(scalar_text(raw, "/foundedOn/year").unwrap_or_default());
        }
        if let Some(industries) = raw.get("companyIndustries").and_then(Value::as_array) {
            company["industries"] =
                industries.iter().map(|industry| text(industry, "/localizedName")).collect();
        }
        if let Some(headquarter) = raw.get("headquarter") {
            for (target, source) in [
                ("city", "/city"),
                ("country", "/country"),
                ("geographicArea", "/geographicArea"),
                ("addr1", "/line1"),
                ("addr2", "/line2"),
                ("postalCode", "/postalCode"),
            ] {
                company[target] = Value::String(text(headquarter, source));
            }
        }
        if raw.get("followingInfo").is_some() {
            company["linkedInFollowerCount"] = or_default(raw, "/followingInfo/followerCount", json!(0));
        }
        if raw.get("staffCount").is_some() {
            company["staffCount"] = or_default(raw, "/staffCount", json!(0));
        }
        if let Some(logo) = raw.pointer("/logo/image") {
            company["logo"] = Value::String(image_path(logo));
        }
        if let Some(cover) = raw.pointer("/backgroundCoverImage/image") {
            company["backgroundCoverImage"] = Value::String(image_path(cover));
        }
        if let Some(photo) = raw.get("backgroundCoverPhoto") {
            company["backgroundCoverPhoto"] = Value::String(image_path(photo));
        }
        company
    }
}
