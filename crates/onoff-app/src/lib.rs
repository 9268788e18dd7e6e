//! OnOff Application
//!
//! Demo window hosting a single OnOff button with live controls for its
//! style and state.

mod app;
mod config;
mod shortcuts;
mod ui;

pub use app::App;
pub use config::{AppConfig, AppError};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use ui::{UiAction, UiState, render_ui};
