//! Demo window configuration.

use onoff_core::{ButtonConfig, OnOffError, SerializableColor};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading the demo configuration.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Button(#[from] OnOffError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Side of the square button frame, in logical pixels.
    pub button_size: f64,
    pub background_color: SerializableColor,
    pub button: ButtonConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "OnOff".to_string(),
            width: 480,
            height: 480,
            button_size: 160.0,
            background_color: SerializableColor::new(38, 50, 56, 255),
            button: ButtonConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let config: Self = serde_json::from_str(json)?;
        config.button.validate()?;
        Ok(config)
    }

    /// Load a config file; missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn background(&self) -> Color {
        self.background_color.into()
    }
}
