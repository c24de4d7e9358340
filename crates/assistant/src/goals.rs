use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

lazy_static! {
    /// A new goal starts at a numbered item ("1. ") or a "- Goal:" bullet.
    static ref GOAL_SPLIT: Regex =
        Regex::new(r"(?m)^\s*(?:\d+\.\s*|-\s*Goal:\s*)").expect("valid goal split regex");
    static ref GOAL_LINE: Regex =
        Regex::new(r"(?:Goal:)?\s*([^\n]+)").expect("valid goal line regex");
    static ref TARGET_LINE: Regex =
        Regex::new(r"Target:\s*([^\n]+)").expect("valid target line regex");
    static ref IMPACT_LINE: Regex =
        Regex::new(r"Impact:\s*([^\n]+)").expect("valid impact line regex");
    static ref POINTS_LINE: Regex =
        Regex::new(r"Points:\s*([^\n]+)").expect("valid points line regex");
}

/// Canned goals served whenever the model is unavailable. The text follows
/// the same "- Goal:" layout the model is asked to produce, so the structured
/// parse works on it too.
pub const FALLBACK_RECOMMENDATIONS: &str = "\
- Goal: Reduce water usage
  - Target: Save 20 liters of water per day
  - Impact: Conserve a valuable resource and reduce water bills
  - Points: 100 points for meeting weekly targets

- Goal: Minimize single-use plastics
  - Target: Avoid 5 single-use plastic items per week
  - Impact: Reduce plastic pollution in oceans and landfills
  - Points: 150 points for using reusable alternatives

- Goal: Lower energy consumption
  - Target: Reduce energy usage by 10% this month
  - Impact: Decrease carbon emissions and save on electricity costs
  - Points: 200 points for meeting the monthly goal";

/// One structured goal parsed out of the model's free-form answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Goal {
    pub goal: String,
    pub target: String,
    pub impact: String,
    pub points: String,
}

/// The full recommendation payload handed back to clients. `degraded` is set
/// when the text is the canned fallback rather than a model answer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Recommendations {
    pub recommendations: String,
    pub goals: Vec<Goal>,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Recommendations {
    pub fn from_model(text: String) -> Self {
        let goals = parse_goals(&text);
        Self {
            recommendations: text,
            goals,
            degraded: false,
            message: None,
        }
    }

    pub fn fallback(message: impl Into<String>) -> Self {
        Self {
            recommendations: FALLBACK_RECOMMENDATIONS.to_string(),
            goals: parse_goals(FALLBACK_RECOMMENDATIONS),
            degraded: true,
            message: Some(message.into()),
        }
    }
}

fn labeled(regex: &Regex, block: &str) -> String {
    regex
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Split free-form model output into structured goals. Never fails: blocks
/// missing a label get empty fields, a block with no usable title gets
/// "Personalized Goal".
pub fn parse_goals(text: &str) -> Vec<Goal> {
    GOAL_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            let goal = GOAL_LINE
                .captures(block)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| "Personalized Goal".to_string());

            Goal {
                goal,
                target: labeled(&TARGET_LINE, block),
                impact: labeled(&IMPACT_LINE, block),
                points: labeled(&POINTS_LINE, block),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_goal_bullet_blocks() {
        let text = "- Goal: Reduce water\n  - Target: 20 L/day\n  - Impact: Lower bills\n  - Points: 100";
        let goals = parse_goals(text);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].goal, "Reduce water");
        assert_eq!(goals[0].target, "20 L/day");
        assert_eq!(goals[0].impact, "Lower bills");
        assert_eq!(goals[0].points, "100");
    }

    #[test]
    fn parses_numbered_blocks() {
        let text = "1. Bike to class\n   Target: 3 rides per week\n2. Meatless Mondays\n   Target: 1 day per week";
        let goals = parse_goals(text);
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].goal, "Bike to class");
        assert_eq!(goals[0].target, "3 rides per week");
        assert_eq!(goals[1].goal, "Meatless Mondays");
    }

    #[test]
    fn missing_labels_leave_fields_empty() {
        let goals = parse_goals("- Goal: Just a title");
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].goal, "Just a title");
        assert_eq!(goals[0].target, "");
        assert_eq!(goals[0].impact, "");
        assert_eq!(goals[0].points, "");
    }

    #[test]
    fn empty_input_parses_to_nothing() {
        assert!(parse_goals("").is_empty());
        assert!(parse_goals("   \n  \n").is_empty());
    }

    #[test]
    fn fallback_text_parses_into_three_goals() {
        let goals = parse_goals(FALLBACK_RECOMMENDATIONS);
        assert_eq!(goals.len(), 3);
        assert_eq!(goals[0].goal, "Reduce water usage");
        assert_eq!(goals[1].goal, "Minimize single-use plastics");
        assert_eq!(goals[2].goal, "Lower energy consumption");
        assert_eq!(goals[2].points, "200 points for meeting the monthly goal");
    }

    #[test]
    fn fallback_payload_is_marked_degraded() {
        let recs = Recommendations::fallback("model unavailable");
        assert!(recs.degraded);
        assert_eq!(recs.goals.len(), 3);
        assert_eq!(recs.message.as_deref(), Some("model unavailable"));
    }
}
