use serde::Serialize;

use super::PayloadError;

#[derive(Debug, Serialize)]
struct Annotation<'a> {
    properties: DescriptionProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DescriptionProperties<'a> {
    key: String,
    from_source_system: bool,
    description: &'a str,
}

/// Body for the `descriptions` annotation of an asset. Each call gets a new random key.
pub fn description_payload(description: &str) -> Result<String, PayloadError> {
    let body = Annotation {
        properties: DescriptionProperties {
            key: uuid::Uuid::new_v4().to_string(),
            from_source_system: false,
            description,
        },
    };
    Ok(serde_json::to_string(&body)?)
}
