use storage::models::{Category, ImpactMetric, User};
use storage::services::scoring::CategoryTotals;

/// Defines the eco-chatbot's behavior for every chat completion.
pub const CHAT_SYSTEM_PROMPT: &str = "\
You are EcoBot, an AI assistant specialized in sustainability and environmental topics.
Your purpose is to help students understand environmental issues, provide eco-friendly tips,
and suggest sustainable actions they can take in their daily lives.

When responding:
1. Be informative but concise
2. Provide practical, actionable advice for students
3. Focus on positive impact and encouragement
4. Include specific facts about environmental impact when relevant
5. Suggest small, achievable actions that students can take
6. Relate answers to the sustainability metrics tracked in the app: water saved, energy saved, waste reduced, and CO2 avoided

Always maintain a friendly, encouraging tone and avoid being judgmental.";

pub const RECOMMENDATION_SYSTEM_PROMPT: &str = "You are an AI sustainability coach that \
provides personalized environmental goals based on user activity data.";

pub const WASTE_SYSTEM_PROMPT: &str = r#"You are an AI waste classification assistant. Analyze the image and:
1. Identify the type of waste item
2. Classify it into one of these categories: Recyclable, Compostable, Electronic Waste, Hazardous Waste, or General Waste
3. Provide specific disposal instructions
4. Suggest sustainable alternatives if applicable
5. Include an interesting fact about the environmental impact of this type of waste

Format your response as JSON with the following structure:
{
  "itemName": "Name of the identified item",
  "category": "Waste category",
  "disposalInstructions": "How to properly dispose of this item",
  "sustainableAlternatives": "Suggestions for more sustainable alternatives",
  "environmentalImpact": "An interesting fact about environmental impact",
  "confidenceLevel": "High/Medium/Low based on your confidence in the identification"
}

Return ONLY the JSON object with no additional text."#;

pub const WASTE_USER_PROMPT: &str =
    "What type of waste is this and how should it be disposed of?";

/// Build the goal-recommendation prompt from a user's profile and history.
/// The most recent five activities are named so the model can build on them.
pub fn recommendation_prompt(user: &User, metrics: &[ImpactMetric]) -> String {
    let totals = CategoryTotals::from_metrics(metrics);

    let mut metric_lines = String::new();
    for category in Category::ALL {
        let value = totals.get(category);
        if value > 0.0 {
            metric_lines.push_str(&format!(
                "  - {}: {} {}\n",
                category,
                value,
                category.unit()
            ));
        }
    }
    if metric_lines.is_empty() {
        metric_lines.push_str("  - no activity logged yet\n");
    }

    // Metrics arrive newest first from the store.
    let mut activity_lines = String::new();
    for metric in metrics.iter().take(5) {
        match &metric.description {
            Some(description) if !description.is_empty() => {
                activity_lines.push_str(&format!("  - {}\n", description));
            }
            _ => {
                activity_lines.push_str(&format!(
                    "  - {} {} of {}\n",
                    metric.value,
                    metric.category.unit(),
                    metric.category
                ));
            }
        }
    }
    if activity_lines.is_empty() {
        activity_lines.push_str("  - none\n");
    }

    format!(
        "Based on this user's sustainability data, suggest 3 personalized goals that would \
help them improve their environmental impact.

User Data:
- Total Points: {}
- Impact Metrics:
{}
Recent Activities:
{}
Provide 3 specific, actionable goals that:
1. Are realistic and achievable
2. Build on the user's current activities
3. Address areas where they could improve
4. Include a measurable target

Format each goal as:
- Goal: [Short goal title]
- Target: [Specific measurable target]
- Impact: [Environmental impact]
- Points: [Points they would earn]",
        user.points, metric_lines, activity_lines
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user() -> User {
        User {
            id: "u1".into(),
            name: "Jamie".into(),
            email: "jamie@example.com".into(),
            image: String::new(),
            points: 320,
            badges: vec![],
            sustainability_score: 0.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn prompt_names_totals_with_units() {
        let metrics = vec![ImpactMetric {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            category: Category::Water,
            value: 50.0,
            description: Some("Shorter showers".into()),
            logged_at: Utc::now(),
        }];

        let prompt = recommendation_prompt(&user(), &metrics);
        assert!(prompt.contains("Total Points: 320"));
        assert!(prompt.contains("water: 50 L"));
        assert!(prompt.contains("- Shorter showers"));
    }

    #[test]
    fn prompt_handles_empty_history() {
        let prompt = recommendation_prompt(&user(), &[]);
        assert!(prompt.contains("no activity logged yet"));
        assert!(prompt.contains("- none"));
    }

    #[test]
    fn descriptionless_activity_falls_back_to_value_and_unit() {
        let metrics = vec![ImpactMetric {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            category: Category::Transport,
            value: 3.5,
            description: None,
            logged_at: Utc::now(),
        }];

        let prompt = recommendation_prompt(&user(), &metrics);
        assert!(prompt.contains("3.5 kg CO₂ of transport"));
    }
}
