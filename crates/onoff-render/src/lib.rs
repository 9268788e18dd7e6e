//! OnOff Render Library
//!
//! Renderer abstraction and implementations for the OnOff button.
//! The default implementation uses Vello for GPU-accelerated rendering.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{
    RenderContext, RenderResult, Renderer, RendererError, StrokeCommand, button_strokes,
    layer_frames,
};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
