//! User settings: the API credential and the response language.
//!
//! [`Settings`] is a plain value handed to the analyzer on every call.
//! [`SettingsStore`] persists it between runs.

pub mod store;

pub use store::{default_settings_path, SettingsStore};

use crate::analysis::language::Language;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub language: Language,
}

impl Settings {
    pub fn new(api_key: impl Into<String>, language: Language) -> Self {
        Self {
            api_key: api_key.into(),
            language,
        }
    }

    pub fn has_valid_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Key with everything but the last four characters masked
    pub fn masked_key(&self) -> String {
        let key = self.api_key.trim();
        let chars: Vec<char> = key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}
