//! Status bar settings.
//!
//! Loaded from a JSON file such as:
//!
//! ```json
//! { "disabled_widgets": ["Statly"], "width": 100 }
//! ```

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Default status bar width in columns.
const DEFAULT_WIDTH: usize = 80;

/// User settings for the status bar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusBarSettings {
    /// Identifiers of widgets the user switched off.
    pub disabled_widgets: Vec<String>,
    /// Width the status line is rendered at.
    pub width: usize,
}

impl Default for StatusBarSettings {
    fn default() -> Self {
        Self {
            disabled_widgets: Vec::new(),
            width: DEFAULT_WIDTH,
        }
    }
}

impl StatusBarSettings {
    /// Loads settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses settings from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Returns whether the widget with this identifier may be shown.
    pub fn is_enabled(&self, id: &str) -> bool {
        !self.disabled_widgets.iter().any(|d| d == id)
    }

    /// Returns the render width.
    pub fn width(&self) -> usize {
        self.width
    }
}

/// Failure to load settings.
#[derive(Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    Io(io::Error),
    /// The settings file is not valid settings JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read settings: {e}"),
            Self::Parse(e) => write!(f, "invalid settings: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = StatusBarSettings::default();
        assert!(settings.is_enabled("Statly"));
        assert_eq!(settings.width(), 80);
    }

    #[test]
    fn test_partial_json() {
        let settings = StatusBarSettings::from_json(r#"{ "disabled_widgets": ["Statly"] }"#).unwrap();
        assert!(!settings.is_enabled("Statly"));
        assert!(settings.is_enabled("Other"));
        assert_eq!(settings.width(), 80);

        let settings = StatusBarSettings::from_json("{}").unwrap();
        assert_eq!(settings, StatusBarSettings::default());
    }

    #[test]
    fn test_invalid_json() {
        let err = StatusBarSettings::from_json(r#"{ "width": "wide" }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().starts_with("invalid settings"));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("statly-settings-does-not-exist.json");
        let err = StatusBarSettings::load(path).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
