//! Prompt construction for food and ingredient analysis.
//!
//! Both prompts describe the exact JSON schema the decoder expects and end with
//! the language directive. Everything here is a pure function of its inputs.

use crate::analysis::language::Language;
use crate::analysis::records::AnalysisKind;
use crate::error::{PicNGoError, Result};
use crate::llm::models::ChatMessage;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use std::path::Path;
use tracing::debug;

const FOOD_PROMPT: &str = r#"Analyze this food image and respond with ONLY a valid JSON object. Do not use markdown, code fences or any extra text.

Use exactly this structure:
{
  "food_name": "Name of the food or dish",
  "ingredients": ["ingredient 1", "ingredient 2", "ingredient 3"],
  "calories_estimate": "approximately X-Y calories per serving",
  "health_rating": "Healthy",
  "health_assessment": "A concise 1-2 sentence assessment of the nutritional value and health impact.",
  "tips": ["Practical health tip 1", "Practical health tip 2"]
}

For health_rating use ONLY one of: "Healthy", "Moderate", or "Unhealthy".
If the image is not food, set food_name to "Not food detected" and explain briefly in health_assessment."#;

const INGREDIENT_PROMPT: &str = r#"You are a nutritionist. Analyze the food ingredient "{name}" and respond with ONLY a valid JSON object. Do not use markdown, code fences or any extra text:
{
  "what_it_is": "A clear 1-2 sentence description of what this ingredient is",
  "nutritional_highlights": ["Key nutrient 1 with brief note", "Key nutrient 2", "Key nutrient 3"],
  "health_benefits": ["Specific benefit 1", "Specific benefit 2", "Specific benefit 3"],
  "health_concerns": ["Concern 1, or write 'Generally safe in normal amounts' if there are none"],
  "recommended_amount": "Recommended daily or per-meal amount for a healthy adult"
}"#;

/// JPEG quality used when re-encoding photos for upload
pub const JPEG_QUALITY: u8 = 80;

const JPEG_MIME: &str = "image/jpeg";

/// A photo re-encoded as JPEG, ready to embed in a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    jpeg: Vec<u8>,
}

impl ImageInput {
    /// Decode any format the `image` crate understands and re-encode it as JPEG.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self> {
        let bytes = bytes.as_ref();
        if bytes.is_empty() {
            return Err(PicNGoError::ImageEncodingFailure("image is empty".to_string()));
        }

        let decoded = image::load_from_memory(bytes)
            .map_err(|e| PicNGoError::ImageEncodingFailure(format!("cannot decode image: {}", e)))?;

        let mut jpeg = Vec::new();
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
            encoder.encode_image(&decoded.to_rgb8()).map_err(|e| {
                PicNGoError::ImageEncodingFailure(format!("cannot encode JPEG: {}", e))
            })?;
        }

        debug!(
            original_bytes = bytes.len(),
            jpeg_bytes = jpeg.len(),
            width = decoded.width(),
            height = decoded.height(),
            "Re-encoded image as JPEG"
        );
        Ok(Self { jpeg })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            PicNGoError::ImageEncodingFailure(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_bytes(bytes)
    }

    /// Encoded JPEG bytes
    pub fn as_jpeg(&self) -> &[u8] {
        &self.jpeg
    }

    /// `data:image/jpeg;base64,<payload>`
    pub fn data_uri(&self) -> String {
        let payload = base64::engine::general_purpose::STANDARD.encode(&self.jpeg);
        format!("data:{};base64,{}", JPEG_MIME, payload)
    }
}

/// What is being analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject<'a> {
    Image(&'a ImageInput),
    Ingredient(&'a str),
}

impl Subject<'_> {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            Subject::Image(_) => AnalysisKind::Food,
            Subject::Ingredient(_) => AnalysisKind::Ingredient,
        }
    }
}

/// Instruction text for the food schema
pub fn food_instruction(language: Language) -> String {
    format!("{}\n{}", FOOD_PROMPT, language.prompt_instruction())
}

/// Instruction text for the ingredient schema
pub fn ingredient_instruction(name: &str, language: Language) -> String {
    format!(
        "{}\n{}",
        INGREDIENT_PROMPT.replace("{name}", name.trim()),
        language.prompt_instruction()
    )
}

/// Build the single user-turn message for `subject`
pub fn build_messages(subject: &Subject<'_>, language: Language) -> Vec<ChatMessage> {
    match subject {
        Subject::Image(image) => {
            vec![ChatMessage::user_with_image(image.data_uri(), food_instruction(language))]
        }
        Subject::Ingredient(name) => vec![ChatMessage::user(ingredient_instruction(name, language))],
    }
}
