use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Result;

/// Structured result of classifying a waste item from a photo. Field names
/// stay camelCase on the wire to match the JSON the model is prompted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WasteScan {
    pub item_name: String,
    pub category: String,
    pub disposal_instructions: String,
    #[serde(default)]
    pub sustainable_alternatives: String,
    #[serde(default)]
    pub environmental_impact: String,
    pub confidence_level: String,
}

impl WasteScan {
    /// Served when the model is unavailable or returns something unusable.
    pub fn fallback() -> Self {
        Self {
            item_name: "Unidentified item".to_string(),
            category: "General Waste".to_string(),
            disposal_instructions: "When in doubt, place the item in general waste, or check \
your local recycling guidelines."
                .to_string(),
            sustainable_alternatives: String::new(),
            environmental_impact: String::new(),
            confidence_level: "Low".to_string(),
        }
    }
}

/// Parse the model's answer into a scan result. Models sometimes wrap the
/// JSON in a markdown code fence, so strip one before parsing.
pub fn parse_scan(raw: &str) -> Result<WasteScan> {
    let scan = serde_json::from_str(strip_code_fence(raw))?;
    Ok(scan)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANSWER: &str = r#"{
        "itemName": "Plastic water bottle",
        "category": "Recyclable",
        "disposalInstructions": "Rinse and place in the recycling bin.",
        "sustainableAlternatives": "Carry a reusable bottle.",
        "environmentalImpact": "A plastic bottle can take 450 years to decompose.",
        "confidenceLevel": "High"
    }"#;

    #[test]
    fn parses_plain_json() {
        let scan = parse_scan(ANSWER).unwrap();
        assert_eq!(scan.item_name, "Plastic water bottle");
        assert_eq!(scan.category, "Recyclable");
        assert_eq!(scan.confidence_level, "High");
    }

    #[test]
    fn strips_markdown_fence() {
        let fenced = format!("```json\n{}\n```", ANSWER);
        let scan = parse_scan(&fenced).unwrap();
        assert_eq!(scan.item_name, "Plastic water bottle");
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let minimal = r#"{
            "itemName": "Banana peel",
            "category": "Compostable",
            "disposalInstructions": "Compost it.",
            "confidenceLevel": "Medium"
        }"#;
        let scan = parse_scan(minimal).unwrap();
        assert_eq!(scan.sustainable_alternatives, "");
        assert_eq!(scan.environmental_impact, "");
    }

    #[test]
    fn garbage_fails_to_parse() {
        assert!(parse_scan("not json at all").is_err());
    }

    #[test]
    fn fallback_has_low_confidence() {
        let scan = WasteScan::fallback();
        assert_eq!(scan.confidence_level, "Low");
        assert_eq!(scan.category, "General Waste");
    }
}
