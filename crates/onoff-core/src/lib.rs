//! OnOff Core Library
//!
//! Platform-agnostic geometry, layer model and widget logic for the OnOff
//! toggle button.

pub mod animation;
pub mod button;
pub mod clock;
pub mod config;
pub mod error;
pub mod layer;
pub mod paths;
pub mod timing;

pub use animation::{AnimationKey, BasicAnimation, IMPLICIT_DURATION};
pub use button::{OnOffButton, ToggleTrack, TOGGLE_DURATION};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ButtonConfig, SerializableColor};
pub use error::{OnOffError, OnOffResult};
pub use layer::{LayerSnapshot, ShapeLayer};
pub use paths::{glyph_path, rescale_for_frame, ring_path, stroked_bounds, trim_path};
pub use timing::TimingFunction;
