use serde_json::{json, Map, Value};
use voyager_domain::utils::scrub_id_from_urn;

use super::fields::{
    elements, first_text, image_path, month_end, or_default, scalar_text, text, year_end,
};
use super::ports::ProfileNormalizer;

const RESUME_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/jsonresume/resume-schema/v1.0.0/schema.json";
const RESUME_SCHEMA_VERSION: &str = "1.0.0";

/// Maps a merged profile record onto the JSON Resume schema.
///
/// Records without `profile.firstName` (private or missing profiles) yield the
/// empty skeleton carrying only `meta.identifier`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResumeNormalizer;

impl ProfileNormalizer for JsonResumeNormalizer {
    fn normalize_profile(&self, raw: &Value) -> Value {
        let identifier = text(raw, "/identifier");
        let mut resume = skeleton(raw, &identifier);
        if text(raw, "/profile/firstName").is_empty() {
            return resume;
        }

        let meta = meta(raw, &identifier);
        let basics = basics(raw, &meta);
        resume["basics"] = basics;
        resume["meta"] = meta;
        resume["work"] = elements(raw, "/positionView").map(position).collect();
        resume["volunteer"] = elements(raw, "/volunteerExperienceView").map(volunteer).collect();
        resume["education"] = elements(raw, "/educationView").map(education).collect();
        resume["publications"] = elements(raw, "/publicationView").map(publication).collect();
        resume["skills"] = elements(raw, "/skillView")
            .map(|skill| json!({ "name": text(skill, "/name") }))
            .collect();
        resume["languages"] = elements(raw, "/languageView")
            .map(|language| json!({ "language": text(language, "/name") }))
            .collect();
        resume["projects"] = elements(raw, "/projectView").map(project).collect();
        resume
    }
}

fn skeleton(raw: &Value, identifier: &str) -> Value {
    json!({
        "basics": {
            "name": "",
            "label": "",
            "picture": "",
            "email": "",
            "phone": "",
            "url": "",
            "summary": "",
            "location": {
                "address": "",
                "postalCode": "",
                "city": "",
                "countryCode": "",
                "region": ""
            },
            "profiles": [],
            "original": raw,
        },
        "work": [],
        "volunteer": [],
        "education": [],
        "awards": [],
        "publications": [],
        "skills": [],
        "languages": [],
        "projects": [],
        "interests": [],
        "references": [],
        "meta": {
            "source": "linkedin",
            "canonical": RESUME_SCHEMA_URL,
            "version": RESUME_SCHEMA_VERSION,
            "identifier": identifier,
            "publicIdentifier": "",
            "profileId": "",
            "urnId": "",
        },
    })
}

fn meta(raw: &Value, identifier: &str) -> Value {
    let public_identifier = text(raw, "/profile/miniProfile/publicIdentifier");
    let entity_urn =
        first_text(raw, &["/profile/miniProfile/entityUrn", "/profile/entityUrn"]);
    let object_urn = text(raw, "/profile/miniProfile/objectUrn");
    let resolved_identifier =
        if public_identifier.is_empty() { identifier.to_string() } else { public_identifier.clone() };
    json!({
        "source": "linkedin",
        "canonical": RESUME_SCHEMA_URL,
        "version": RESUME_SCHEMA_VERSION,
        "identifier": resolved_identifier,
        "publicIdentifier": scrub_id_from_urn(&public_identifier),
        "profileId": scrub_id_from_urn(&entity_urn),
        "urnId": scrub_id_from_urn(&object_urn),
    })
}

fn basics(raw: &Value, meta: &Value) -> Value {
    let first_name = first_text(raw, &["/profile/firstName", "/profile/miniProfile/firstName"]);
    let last_name = first_text(raw, &["/profile/lastName", "/profile/miniProfile/lastName"]);
    let label = text(raw, "/profile/headline");
    let mut occupation = text(raw, "/profile/miniProfile/occupation");
    if occupation.is_empty() || occupation == label {
        occupation = current_title(raw);
    }

    let mut profiles: Vec<Value> = raw
        .get("twitterHandles")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(|handle| {
            let name = text(handle, "/name");
            json!({
                "network": "Twitter",
                "username": name,
                "url": format!("https://twitter.com/{name}"),
            })
        })
        .collect();
    let public_identifier = text(meta, "/publicIdentifier");
    if !public_identifier.is_empty() {
        profiles.push(json!({
            "network": "LinkedIn",
            "username": public_identifier,
            "url": format!("https://www.linkedin.com/in/{public_identifier}"),
        }));
    }

    json!({
        "name": format!("{first_name} {last_name}"),
        "label": label,
        "picture": raw.pointer("/profile/miniProfile/picture").map(image_path).unwrap_or_default(),
        "email": text(raw, "/emailAddress"),
        "phone": joined(raw.get("phoneNumbers"), phone_number),
        "url": joined(raw.get("websites"), |site| text(site, "/url")),
        "summary": text(raw, "/profile/summary"),
        "location": {
            "address": text(raw, "/profile/address"),
            "postalCode": text(raw, "/profile/location/basicLocation/postalCode"),
            "city": text(raw, "/profile/locationName"),
            "countryCode": text(raw, "/profile/location/basicLocation/countryCode"),
        },
        "industry": text(raw, "/profile/industryName"),
        "occupation": occupation,
        "birthDate": birth_date(raw.get("birthDateOn")),
        "profiles": profiles,
        "original": raw,
    })
}

/// Title of the first position with a start date and no end date.
fn current_title(raw: &Value) -> String {
    elements(raw, "/positionView")
        .find(|position| {
            position.pointer("/timePeriod/startDate").is_some()
                && position.pointer("/timePeriod/endDate").is_none()
        })
        .map(|position| text(position, "/title"))
        .unwrap_or_default()
}

fn phone_number(entry: &Value) -> String {
    match entry {
        Value::String(number) => number.clone(),
        other => text(other, "/number"),
    }
}

fn joined(list: Option<&Value>, render: impl Fn(&Value) -> String) -> String {
    list.and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(render)
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join("|")
}

fn birth_date(date: Option<&Value>) -> String {
    let Some(date) = date.filter(|date| date.is_object()) else {
        return String::new();
    };
    let year = scalar_text(date, "/year").unwrap_or_else(|| "1900".to_string());
    let month = scalar_text(date, "/month").unwrap_or_default();
    let day = scalar_text(date, "/day").unwrap_or_default();
    format!("{year}-{month}-{day}")
}

fn member(entry: &Value) -> Value {
    let mut info = Map::new();
    for field in ["firstName", "lastName", "occupation", "publicIdentifier"] {
        info.insert(field.to_string(), Value::String(text(entry, &format!("/member/{field}"))));
    }
    if let Some(picture) = entry.pointer("/member/picture") {
        info.insert("picture".to_string(), Value::String(image_path(picture)));
    }
    Value::Object(info)
}

fn position(entry: &Value) -> Value {
    let mut work = json!({
        "name": text(entry, "/companyName"),
        "location": text(entry, "/locationName"),
        "description": "",
        "position": text(entry, "/title"),
        "url": "",
        "startDate": month_end(entry.pointer("/timePeriod/startDate")),
        "endDate": month_end(entry.pointer("/timePeriod/endDate")),
        "summary": text(entry, "/description"),
        "highlights": [],
    });
    if let Some(company) = entry.get("company") {
        work["company"] = json!({
            "urnId": scrub_id_from_urn(&text(entry, "/companyUrn")),
            "employeeCountRange": or_default(company, "/employeeCountRange", json!({})),
            "logo": company.pointer("/miniCompany/logo").map(image_path).unwrap_or_default(),
        });
        work["description"] = Value::String(joined(company.get("industries"), |industry| {
            industry.as_str().unwrap_or_default().to_string()
        }));
    }
    work
}

fn volunteer(entry: &Value) -> Value {
    json!({
        "organization": text(entry, "/companyName"),
        "position": or_default(entry, "/role", json!({})),
        "url": "",
        "startDate": month_end(entry.pointer("/timePeriod/startDate")),
        "endDate": month_end(entry.pointer("/timePeriod/endDate")),
        "summary": text(entry, "/description"),
        "highlights": [],
    })
}

fn education(entry: &Value) -> Value {
    let mut school = json!({
        "institution": text(entry, "/schoolName"),
        "area": text(entry, "/fieldOfStudy"),
        "studyType": text(entry, "/degreeName"),
        "startDate": year_end(entry.pointer("/timePeriod/startDate")),
        "endDate": year_end(entry.pointer("/timePeriod/endDate")),
        "gpa": text(entry, "/grade"),
        "courses": text(entry, "/activities").split('\n').collect::<Vec<_>>(),
    });
    if let Some(details) = entry.get("school") {
        let mut info = json!({
            "active": details.get("active").and_then(Value::as_bool).unwrap_or(false),
            "name": text(details, "/schoolName"),
        });
        if let Some(logo) = details.get("logo") {
            info["logo"] = Value::String(image_path(logo));
        }
        school["school"] = info;
    }
    school
}

fn publication(entry: &Value) -> Value {
    let release_date = match entry.get("date") {
        Some(date) if date.get("year").is_some() => format!(
            "{}-{}-{}",
            scalar_text(date, "/year").unwrap_or_default(),
            scalar_text(date, "/month").unwrap_or_default(),
            scalar_text(date, "/day").unwrap_or_default()
        ),
        _ => String::new(),
    };
    let mut info = json!({
        "name": text(entry, "/name"),
        "publisher": text(entry, "/publisher"),
        "releaseDate": release_date,
        "url": text(entry, "/url"),
        "summary": text(entry, "/description"),
    });
    if let Some(authors) = entry.get("authors").and_then(Value::as_array).filter(|a| !a.is_empty()) {
        info["authors"] = authors.iter().map(member).collect();
    }
    info
}

fn project(entry: &Value) -> Value {
    let mut info = json!({
        "name": text(entry, "/title"),
        "description": text(entry, "/description"),
        "highlights": [],
        "keywords": [],
        "startDate": year_end(entry.pointer("/timePeriod/startDate")),
        "endDate": year_end(entry.pointer("/timePeriod/endDate")),
        "url": text(entry, "/url"),
        "roles": [],
        "entity": "",
        "type": "",
    });
    if let Some(members) = entry.get("members").and_then(Value::as_array).filter(|m| !m.is_empty()) {
        info["members"] = members.iter().map(member).collect();
    }
    info
}
