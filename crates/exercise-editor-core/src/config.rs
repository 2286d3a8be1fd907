//! Editor configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("editor class must not be empty")]
    EmptyClass,
}

/// Maximum log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Options for a mounted editor. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Class set on the editable root element.
    pub editor_class: String,
    /// Render the JSON state dump below the editor.
    pub debug_panel: bool,
    /// `None` picks DEBUG for debug builds, INFO otherwise.
    pub log_level: Option<LogLevel>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            editor_class: "exercise-editor".to_string(),
            debug_panel: true,
            log_level: None,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Reject values the DOM layer cannot use.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.editor_class.trim().is_empty() {
            return Err(ConfigError::EmptyClass);
        }
        Ok(self)
    }

    pub fn max_level(&self) -> tracing::Level {
        match self.log_level {
            Some(level) => level.into(),
            None if cfg!(debug_assertions) => tracing::Level::DEBUG,
            None => tracing::Level::INFO,
        }
    }
}
