use crate::error::PicNGoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language the model is asked to answer in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "zh")]
    Chinese,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Japanese, Language::Chinese];

    /// Storage tag
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Japanese => "ja",
            Language::Chinese => "zh",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Japanese => "日本語",
            Language::Chinese => "中文",
        }
    }

    /// Directive appended to every prompt
    pub fn prompt_instruction(self) -> &'static str {
        match self {
            Language::English => "Respond entirely in English.",
            Language::Japanese => "日本語で回答してください。",
            Language::Chinese => "请用中文回答。",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Language {
    type Err = PicNGoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "en" | "english" => Ok(Language::English),
            "ja" | "japanese" | "日本語" => Ok(Language::Japanese),
            "zh" | "chinese" | "中文" => Ok(Language::Chinese),
            _ => Err(PicNGoError::ConfigError(format!(
                "unknown language '{}', expected one of: en, ja, zh",
                s
            ))),
        }
    }
}
