pub mod analyzer;
pub mod decoder;
pub mod language;
pub mod prompt;
pub mod records;

pub use analyzer::FoodAnalyzer;
pub use decoder::{decode, decode_record, decode_reply};
pub use language::Language;
pub use prompt::{build_messages, ImageInput, Subject};
pub use records::{AnalysisKind, AnalysisRecord, FoodAnalysisResult, HealthLevel, IngredientAnalysis};
