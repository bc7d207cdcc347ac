//! Food photo nutrition analysis backed by a vision-capable chat model.
//!
//! A food image (or an ingredient name) is turned into a prompt, sent to a
//! chat-completion endpoint, and the model's JSON reply is decoded into a
//! [`FoodAnalysisResult`](analysis::FoodAnalysisResult) or an
//! [`IngredientAnalysis`](analysis::IngredientAnalysis).

pub mod analysis;
pub mod error;
pub mod llm;
pub mod settings;

pub use error::{PicNGoError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{
        AnalysisKind, AnalysisRecord, FoodAnalysisResult, FoodAnalyzer, HealthLevel, ImageInput,
        IngredientAnalysis, Language, Subject,
    };
    pub use crate::error::{PicNGoError, Result};
    pub use crate::llm::gateways::{OpenAIConfig, OpenAIGateway};
    pub use crate::llm::{ChatGateway, InferenceClient};
    pub use crate::settings::{Settings, SettingsStore};
}
