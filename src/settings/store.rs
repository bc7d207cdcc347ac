use crate::analysis::language::Language;
use crate::error::{PicNGoError, Result};
use crate::settings::Settings;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const API_KEY_STORAGE_KEY: &str = "api_key";
pub const LANGUAGE_STORAGE_KEY: &str = "app_language";

/// Default settings file, `~/.picngo/settings.json`
pub fn default_settings_path() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".picngo")
        .join("settings.json")
}

/// Key-value settings persisted as a flat JSON object.
///
/// Keys this store does not know about are preserved on save.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields the defaults
    pub fn load(&self) -> Result<Settings> {
        let entries = self.read_entries()?;

        let api_key = entries
            .get(API_KEY_STORAGE_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let language = match entries.get(LANGUAGE_STORAGE_KEY).and_then(Value::as_str) {
            Some(code) => Language::from_code(code).unwrap_or_else(|| {
                warn!(code, "Unknown stored language, using English");
                Language::English
            }),
            None => Language::English,
        };

        Ok(Settings { api_key, language })
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(API_KEY_STORAGE_KEY.to_string(), Value::String(settings.api_key.clone()));
        entries.insert(
            LANGUAGE_STORAGE_KEY.to_string(),
            Value::String(settings.language.code().to_string()),
        );
        self.write_entries(&entries)
    }

    /// Store a trimmed API key. Blank keys are rejected; use [`clear_api_key`](Self::clear_api_key).
    pub fn set_api_key(&self, api_key: &str) -> Result<Settings> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(PicNGoError::ConfigError("API key must not be blank".to_string()));
        }
        self.update(|settings| settings.api_key = api_key.to_string())
    }

    pub fn clear_api_key(&self) -> Result<Settings> {
        self.update(|settings| settings.api_key.clear())
    }

    pub fn set_language(&self, language: Language) -> Result<Settings> {
        self.update(|settings| settings.language = language)
    }

    fn update(&self, change: impl FnOnce(&mut Settings)) -> Result<Settings> {
        let mut settings = self.load()?;
        change(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No settings file yet, using defaults");
            return Ok(Map::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(entries) => Ok(entries),
            _ => Err(PicNGoError::ConfigError(format!(
                "settings file {} is not a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, SettingsStore) {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::open(dir.path().join("nested").join("settings.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let (_dir, store) = store();
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_settings_persist_across_stores() {
        let (_dir, store) = store();
        store.save(&Settings::new("sk-live", Language::Japanese)).unwrap();

        let reopened = SettingsStore::open(store.path());
        assert_eq!(reopened.load().unwrap(), Settings::new("sk-live", Language::Japanese));
    }

    #[test]
    fn test_set_api_key_trims_and_rejects_blank() {
        let (_dir, store) = store();

        let settings = store.set_api_key("  sk-padded \n").unwrap();
        assert_eq!(settings.api_key, "sk-padded");
        assert!(store.set_api_key("   ").is_err());
        assert_eq!(store.load().unwrap().api_key, "sk-padded");
    }

    #[test]
    fn test_clear_api_key_keeps_language() {
        let (_dir, store) = store();
        store.save(&Settings::new("sk-live", Language::Chinese)).unwrap();

        let settings = store.clear_api_key().unwrap();
        assert_eq!(settings, Settings::new("", Language::Chinese));
        assert!(!store.load().unwrap().has_valid_key());
    }

    #[test]
    fn test_set_language() {
        let (_dir, store) = store();
        store.set_language(Language::Japanese).unwrap();
        assert_eq!(store.load().unwrap().language, Language::Japanese);
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"api_key":"sk-x","app_language":"fr"}"#).unwrap();

        let settings = store.load().unwrap();
        assert_eq!(settings.api_key, "sk-x");
        assert_eq!(settings.language, Language::English);
    }

    #[test]
    fn test_foreign_keys_survive_save() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"theme":"dark"}"#).unwrap();

        store.set_api_key("sk-new").unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw[API_KEY_STORAGE_KEY], "sk-new");
        assert_eq!(raw[LANGUAGE_STORAGE_KEY], "en");
    }

    #[test]
    fn test_non_object_file_is_config_error() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "[1, 2, 3]").unwrap();

        assert!(matches!(store.load(), Err(PicNGoError::ConfigError(_))));
    }

    #[test]
    fn test_default_path_is_under_home() {
        let path = default_settings_path();
        assert!(path.ends_with(".picngo/settings.json"));
    }
}
