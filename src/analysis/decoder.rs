use crate::analysis::records::{AnalysisKind, AnalysisRecord};
use crate::error::{PicNGoError, Result};
use crate::llm::client::ModelReply;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Characters of raw reply kept in a decode failure
pub const RAW_PREFIX_CHARS: usize = 150;

/// Strictly decode cleaned model text into `T`.
///
/// No partial recovery is attempted. On failure the error carries the first
/// [`RAW_PREFIX_CHARS`] characters of `text`.
pub fn decode<T: DeserializeOwned>(kind: AnalysisKind, text: &str) -> Result<T> {
    parse(kind, text, text)
}

/// Decode the cleaned text of `reply`, reporting the raw reply on failure.
///
/// Fence stripping can leave nothing behind, so the prefix comes from what the
/// model actually sent.
pub fn decode_reply<T: DeserializeOwned>(kind: AnalysisKind, reply: &ModelReply) -> Result<T> {
    parse(kind, &reply.text, &reply.raw)
}

/// Decode `reply` into the record variant matching `kind`
pub fn decode_record(kind: AnalysisKind, reply: &ModelReply) -> Result<AnalysisRecord> {
    match kind {
        AnalysisKind::Food => decode_reply(kind, reply).map(AnalysisRecord::Food),
        AnalysisKind::Ingredient => decode_reply(kind, reply).map(AnalysisRecord::Ingredient),
    }
}

fn parse<T: DeserializeOwned>(kind: AnalysisKind, text: &str, raw: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        warn!(kind = kind.description(), error = %e, "Model reply did not match schema");
        PicNGoError::DecodeFailure {
            kind: kind.description(),
            raw_prefix: raw.chars().take(RAW_PREFIX_CHARS).collect(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::records::{FoodAnalysisResult, IngredientAnalysis};

    const APPLE: &str = r#"{"food_name":"Apple","ingredients":["apple"],"calories_estimate":"~95 calories","health_rating":"Healthy","health_assessment":"Low calorie, high fiber.","tips":["Eat with skin for fiber"]}"#;

    fn garlic() -> IngredientAnalysis {
        IngredientAnalysis {
            what_it_is: "A bulb in the onion family.".to_string(),
            nutritional_highlights: vec!["Manganese".to_string(), "Vitamin B6".to_string()],
            health_benefits: vec!["May support heart health".to_string()],
            health_concerns: vec![],
            recommended_amount: "1-2 cloves per day".to_string(),
        }
    }

    #[test]
    fn test_decode_food_fields_exactly() {
        let result: FoodAnalysisResult = decode(AnalysisKind::Food, APPLE).unwrap();

        assert_eq!(result.food_name, "Apple");
        assert_eq!(result.ingredients, vec!["apple"]);
        assert_eq!(result.calories_estimate, "~95 calories");
        assert_eq!(result.health_rating, "Healthy");
        assert_eq!(result.health_assessment, "Low calorie, high fiber.");
        assert_eq!(result.tips, vec!["Eat with skin for fiber"]);
    }

    #[test]
    fn test_ingredient_round_trip_with_empty_sequences() {
        let mut record = garlic();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(decode::<IngredientAnalysis>(AnalysisKind::Ingredient, &json).unwrap(), record);

        record.nutritional_highlights.clear();
        record.health_benefits.clear();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(decode::<IngredientAnalysis>(AnalysisKind::Ingredient, &json).unwrap(), record);
    }

    #[test]
    fn test_food_round_trip_keeps_duplicates_and_order() {
        let record = FoodAnalysisResult {
            food_name: "Salad".to_string(),
            ingredients: vec!["tomato".to_string(), "lettuce".to_string(), "tomato".to_string()],
            calories_estimate: String::new(),
            health_rating: "Healthy".to_string(),
            health_assessment: "Fresh.".to_string(),
            tips: vec![],
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(decode::<FoodAnalysisResult>(AnalysisKind::Food, &json).unwrap(), record);
    }

    #[test]
    fn test_non_json_reports_raw_text() {
        let err = decode::<FoodAnalysisResult>(AnalysisKind::Food, "not json").unwrap_err();

        match &err {
            PicNGoError::DecodeFailure { kind, raw_prefix } => {
                assert_eq!(*kind, "food analysis");
                assert_eq!(raw_prefix, "not json");
            }
            other => panic!("Expected DecodeFailure, got {:?}", other),
        }
        assert!(err.to_string().contains("not json"));
    }

    #[test]
    fn test_missing_field_fails_instead_of_partial_record() {
        let without_tips = r#"{"food_name":"Apple","ingredients":[],"calories_estimate":"","health_rating":"Healthy","health_assessment":""}"#;
        let result = decode::<FoodAnalysisResult>(AnalysisKind::Food, without_tips);
        assert!(matches!(result, Err(PicNGoError::DecodeFailure { .. })));
    }

    #[test]
    fn test_null_sequence_fails() {
        let null_benefits = r#"{"what_it_is":"x","nutritional_highlights":[],"health_benefits":null,"health_concerns":[],"recommended_amount":"x"}"#;
        let result = decode::<IngredientAnalysis>(AnalysisKind::Ingredient, null_benefits);
        assert!(matches!(result, Err(PicNGoError::DecodeFailure { .. })));
    }

    #[test]
    fn test_raw_prefix_is_bounded_on_char_boundaries() {
        let long = "食".repeat(400);
        let err = decode::<FoodAnalysisResult>(AnalysisKind::Food, &long).unwrap_err();

        match err {
            PicNGoError::DecodeFailure { raw_prefix, .. } => {
                assert_eq!(raw_prefix.chars().count(), RAW_PREFIX_CHARS);
            }
            other => panic!("Expected DecodeFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_is_deterministic() {
        let first = decode::<FoodAnalysisResult>(AnalysisKind::Food, "{oops").unwrap_err();
        let second = decode::<FoodAnalysisResult>(AnalysisKind::Food, "{oops").unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_decode_record_selects_variant() {
        match decode_record(AnalysisKind::Food, &ModelReply::new(APPLE)).unwrap() {
            AnalysisRecord::Food(food) => assert_eq!(food.food_name, "Apple"),
            other => panic!("Expected Food, got {:?}", other),
        }

        let json = serde_json::to_string(&garlic()).unwrap();
        assert_eq!(
            decode_record(AnalysisKind::Ingredient, &ModelReply::new(json)).unwrap(),
            AnalysisRecord::Ingredient(garlic())
        );

        let err = decode_record(AnalysisKind::Ingredient, &ModelReply::new(APPLE)).unwrap_err();
        assert!(err.to_string().starts_with("Could not parse ingredient analysis."));
    }

    #[test]
    fn test_fenced_reply_decodes_inner_json() {
        let reply = ModelReply::new(format!("```json\n{}\n```", APPLE));
        let result: FoodAnalysisResult = decode_reply(AnalysisKind::Food, &reply).unwrap();
        assert_eq!(result.food_name, "Apple");
    }

    #[test]
    fn test_single_line_fenced_reply_reports_raw_text() {
        let raw = format!("```{}```", APPLE);
        let err = decode_reply::<FoodAnalysisResult>(AnalysisKind::Food, &ModelReply::new(raw.as_str()))
            .unwrap_err();

        match err {
            PicNGoError::DecodeFailure { raw_prefix, .. } => {
                assert!(!raw_prefix.is_empty());
                assert!(raw_prefix.starts_with("```{\"food_name\":\"Apple\""));
                assert!(raw.starts_with(&raw_prefix));
            }
            other => panic!("Expected DecodeFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_rating_still_decodes() {
        let unclear = APPLE.replace("\"Healthy\"", "\"Unclear\"");
        let result: FoodAnalysisResult = decode(AnalysisKind::Food, &unclear).unwrap();
        assert_eq!(result.health_rating, "Unclear");
    }
}
