//! Typed analysis results as decoded from the model's JSON reply.
//!
//! Sequence fields may come back empty but are never optional: a reply missing
//! any field fails to decode instead of producing a partial record.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Nutritional assessment of a food photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodAnalysisResult {
    pub food_name: String,
    pub ingredients: Vec<String>,
    pub calories_estimate: String,
    pub health_rating: String,
    pub health_assessment: String,
    pub tips: Vec<String>,
}

/// Health tier derived from the free-text `health_rating`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthLevel {
    Healthy,
    Moderate,
    Unhealthy,
}

impl HealthLevel {
    pub fn label(self) -> &'static str {
        match self {
            HealthLevel::Healthy => "Healthy",
            HealthLevel::Moderate => "Moderate",
            HealthLevel::Unhealthy => "Unhealthy",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            HealthLevel::Healthy => "✅",
            HealthLevel::Moderate => "⚠️",
            HealthLevel::Unhealthy => "❌",
        }
    }

    /// Classify a rating, case-insensitively. `None` when outside the closed set.
    pub fn parse(rating: &str) -> Option<Self> {
        match rating.trim().to_lowercase().as_str() {
            "healthy" => Some(HealthLevel::Healthy),
            "moderate" => Some(HealthLevel::Moderate),
            "unhealthy" => Some(HealthLevel::Unhealthy),
            _ => None,
        }
    }
}

impl fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

impl FoodAnalysisResult {
    /// Health tier for presentation. Unrecognized ratings fall back to
    /// [`HealthLevel::Moderate`] and are logged.
    pub fn health_level(&self) -> HealthLevel {
        HealthLevel::parse(&self.health_rating).unwrap_or_else(|| {
            warn!(
                health_rating = %self.health_rating,
                food_name = %self.food_name,
                "Unrecognized health rating from model, treating as Moderate"
            );
            HealthLevel::Moderate
        })
    }

    /// Whether the rating was one of the closed set
    pub fn has_recognized_rating(&self) -> bool {
        HealthLevel::parse(&self.health_rating).is_some()
    }
}

/// Detail lookup for a single ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientAnalysis {
    pub what_it_is: String,
    pub nutritional_highlights: Vec<String>,
    pub health_benefits: Vec<String>,
    pub health_concerns: Vec<String>,
    pub recommended_amount: String,
}

/// Which schema a reply is expected to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    Food,
    Ingredient,
}

impl AnalysisKind {
    pub fn description(self) -> &'static str {
        match self {
            AnalysisKind::Food => "food analysis",
            AnalysisKind::Ingredient => "ingredient analysis",
        }
    }

    /// Output token budget for one request of this kind
    pub fn max_tokens(self) -> u32 {
        match self {
            AnalysisKind::Food => 1024,
            AnalysisKind::Ingredient => 600,
        }
    }
}

/// Decoded reply of either schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalysisRecord {
    Food(FoodAnalysisResult),
    Ingredient(IngredientAnalysis),
}

impl AnalysisRecord {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisRecord::Food(_) => AnalysisKind::Food,
            AnalysisRecord::Ingredient(_) => AnalysisKind::Ingredient,
        }
    }
}
