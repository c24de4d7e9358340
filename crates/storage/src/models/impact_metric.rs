use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Water,
    Energy,
    Waste,
    Transport,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Water,
        Category::Energy,
        Category::Waste,
        Category::Transport,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Energy => "energy",
            Self::Waste => "waste",
            Self::Transport => "transport",
            Self::Other => "other",
        }
    }

    /// Display unit for logged values in this category.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Water => "L",
            Self::Energy => "kWh",
            Self::Waste => "kg",
            Self::Transport => "kg CO₂",
            Self::Other => "units",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "water" => Self::Water,
            "energy" => Self::Energy,
            "waste" => Self::Waste,
            "transport" => Self::Transport,
            _ => Self::Other,
        })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single logged sustainability action. Immutable once created; the
/// timestamp is assigned by the store, never by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImpactMetric {
    pub id: Uuid,
    pub user_id: String,
    pub category: Category,
    pub value: f64,
    pub description: Option<String>,
    pub logged_at: DateTime<Utc>,
}
