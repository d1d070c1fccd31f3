use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the settings file used by the binary.
pub const SETTINGS_ENV: &str = "DARK_KNIGHT_SETTINGS";
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Text-model connection used by the theme assistant and search suggestions.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AiSettings {
    /// Master switch. When off no request ever leaves the machine.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible API, without `/chat/completions`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key. The key itself
    /// is never written to the settings file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Directory holding the saved layout.
    #[serde(default = "default_layout_dir")]
    pub layout_dir: PathBuf,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Also write logs to this file.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Enable toast notifications in the UI.
    #[serde(default = "default_true")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    #[serde(default = "default_toast_log_path")]
    pub toast_log_path: PathBuf,
    /// Last known window size. If absent, a default size is used.
    #[serde(default = "default_window_size")]
    pub window_size: Option<(i32, i32)>,
    #[serde(default)]
    pub ai: AiSettings,
}

fn default_true() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

fn default_window_size() -> Option<(i32, i32)> {
    Some((1280, 800))
}

fn default_layout_dir() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("dark_knight"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_toast_log_path() -> PathBuf {
    PathBuf::from(crate::toast_log::TOAST_LOG_FILE)
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".into()
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}

fn default_timeout_secs() -> u64 {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout_dir: default_layout_dir(),
            debug_logging: false,
            log_file: None,
            enable_toasts: true,
            toast_duration: default_toast_duration(),
            toast_log_path: default_toast_log_path(),
            window_size: default_window_size(),
            ai: AiSettings::default(),
        }
    }
}

impl Settings {
    /// Read settings from `path`. A missing or empty file yields defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Settings path chosen by the environment, else `settings.json`.
    pub fn path_from_env() -> String {
        std::env::var(SETTINGS_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SETTINGS_FILE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let s: Settings = serde_json::from_str(r#"{"debug_logging": true}"#).unwrap();
        assert!(s.debug_logging);
        assert!(s.enable_toasts);
        assert_eq!(s.toast_duration, 3.0);
        assert_eq!(s.ai, AiSettings::default());
        assert_eq!(s.ai.timeout_secs, 20);
    }

    #[test]
    fn partial_ai_block_keeps_other_defaults() {
        let s: Settings =
            serde_json::from_str(r#"{"ai": {"enabled": false, "model": "local"}}"#).unwrap();
        assert!(!s.ai.enabled);
        assert_eq!(s.ai.model, "local");
        assert_eq!(s.ai.api_key_env, "OPENAI_API_KEY");
    }
}
