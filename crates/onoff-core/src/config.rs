//! Serializable button configuration.

use crate::error::{OnOffError, OnOffResult};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

fn default_line_width() -> f64 {
    1.0
}

fn default_stroke_color() -> SerializableColor {
    SerializableColor::white()
}

fn default_ring_alpha() -> f64 {
    0.5
}

fn default_checked() -> bool {
    true
}

/// Initial visual parameters and state of a button.
///
/// Every field is optional in JSON and falls back to the button defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonConfig {
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: SerializableColor,
    #[serde(default = "default_ring_alpha")]
    pub ring_alpha: f64,
    #[serde(default = "default_checked")]
    pub checked: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            line_width: default_line_width(),
            stroke_color: default_stroke_color(),
            ring_alpha: default_ring_alpha(),
            checked: default_checked(),
        }
    }
}

impl ButtonConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> OnOffResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> OnOffResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> OnOffResult<()> {
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(OnOffError::InvalidLineWidth(self.line_width));
        }
        if !(0.0..=1.0).contains(&self.ring_alpha) {
            return Err(OnOffError::InvalidRingAlpha(self.ring_alpha));
        }
        Ok(())
    }
}
