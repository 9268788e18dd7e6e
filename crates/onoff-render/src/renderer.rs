//! Renderer trait abstraction.

use kurbo::{Affine, BezPath, Rect, Size, Stroke};
use onoff_core::OnOffButton;
use onoff_core::layer::ShapeLayer;
use onoff_core::paths::{stroke_style, trim_path};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The button to draw.
    pub button: &'a OnOffButton,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Outline the layer frames.
    pub show_layer_bounds: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(button: &'a OnOffButton, viewport_size: Size) -> Self {
        Self {
            button,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(38, 50, 56, 255),
            show_layer_bounds: false,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Toggle the layer frame outlines.
    pub fn with_layer_bounds(mut self, show: bool) -> Self {
        self.show_layer_bounds = show;
        self
    }

    /// Transform from logical window coordinates to physical pixels.
    pub fn view_transform(&self) -> Affine {
        Affine::scale(self.scale_factor)
    }
}

/// One stroked path, ready for a backend.
#[derive(Debug, Clone)]
pub struct StrokeCommand {
    pub path: BezPath,
    pub transform: Affine,
    pub color: Color,
    pub stroke: Stroke,
}

/// Stroke commands for the button as it looks at `now`, back to front.
///
/// The ring is drawn whole; the glyph is trimmed to its presentation stroke
/// window. Nothing is produced before the first layout.
pub fn button_strokes(button: &OnOffButton, now: f64, view: Affine) -> Vec<StrokeCommand> {
    let mut commands = Vec::with_capacity(2);
    let origin = Affine::translate(button.frame().origin().to_vec2());

    if let Some(ring) = button.ring_layer() {
        let snapshot = ring.presentation(now);
        commands.push(StrokeCommand {
            path: ring.path.clone(),
            transform: view * origin * ring.to_parent(),
            color: ring.stroke_color,
            stroke: layer_stroke(ring, snapshot.line_width),
        });
    }

    if let Some(glyph) = button.glyph_layer() {
        let snapshot = glyph.presentation(now);
        let visible = trim_path(&glyph.path, snapshot.stroke_start, snapshot.stroke_end);
        if !visible.elements().is_empty() {
            commands.push(StrokeCommand {
                path: visible,
                transform: view * origin * glyph.to_parent(),
                color: glyph.stroke_color,
                stroke: layer_stroke(glyph, snapshot.line_width),
            });
        }
    }

    commands
}

/// Frames of both layers in window coordinates, for debugging overlays.
pub fn layer_frames(button: &OnOffButton) -> Vec<Rect> {
    let offset = button.frame().origin().to_vec2();
    button
        .glyph_layer()
        .into_iter()
        .chain(button.ring_layer())
        .map(|layer| layer.frame() + offset)
        .collect()
}

fn layer_stroke(layer: &ShapeLayer, line_width: f64) -> Stroke {
    stroke_style(line_width.max(0.0))
        .with_caps(layer.line_cap)
        .with_miter_limit(layer.miter_limit)
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering engines.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Shape as KurboShape};
    use onoff_core::{ManualClock, TOGGLE_DURATION};

    fn laid_out(clock: &ManualClock) -> OnOffButton {
        OnOffButton::new()
            .with_clock(clock.clone())
            .with_frame(Rect::new(20.0, 30.0, 120.0, 130.0))
    }

    #[test]
    fn test_no_strokes_before_layout() {
        let button = OnOffButton::new().with_clock(ManualClock::new(0.0));
        assert!(button_strokes(&button, 0.0, Affine::IDENTITY).is_empty());
        assert!(layer_frames(&button).is_empty());
    }

    #[test]
    fn test_ring_then_glyph() {
        let clock = ManualClock::new(0.0);
        let button = laid_out(&clock);
        let commands = button_strokes(&button, 0.0, Affine::IDENTITY);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].color.to_rgba8().a, 128);
        assert_eq!(commands[1].color.to_rgba8().a, 255);
        assert!((commands[1].stroke.width - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_strokes_placed_in_frame() {
        let clock = ManualClock::new(0.0);
        let button = laid_out(&clock);
        let commands = button_strokes(&button, 0.0, Affine::IDENTITY);
        let ring = &commands[0];
        let placed = ring.transform.transform_rect_bbox(ring.path.bounding_box());
        let center = placed.center();
        assert!((center.x - 70.0).abs() < 1.0);
        assert!((center.y - 80.0).abs() < 1.0);
    }

    #[test]
    fn test_view_scale_applied() {
        let clock = ManualClock::new(0.0);
        let button = laid_out(&clock);
        let ctx = RenderContext::new(&button, Size::new(400.0, 400.0)).with_scale_factor(2.0);
        let commands = button_strokes(&button, 0.0, ctx.view_transform());
        let origin = commands[0].transform * Point::ZERO;
        assert!((origin.x - 40.0).abs() < 1e-9);
        assert!((origin.y - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_glyph_trim_follows_animation() {
        let clock = ManualClock::new(0.0);
        let mut button = laid_out(&clock);
        let checked = button_strokes(&button, 0.0, Affine::IDENTITY);
        let checked_len = onoff_core::paths::path_length(&checked[1].path);

        button.toggle();
        clock.advance(TOGGLE_DURATION);
        let commands = button_strokes(&button, button.now(), Affine::IDENTITY);
        let unchecked_len = onoff_core::paths::path_length(&commands[1].path);
        assert!(unchecked_len > checked_len * 3.0);
    }

    #[test]
    fn test_error_messages() {
        let err = RendererError::Surface("Outdated".to_string());
        assert_eq!(err.to_string(), "Surface error: Outdated");
        let result: RenderResult<()> = Err(RendererError::RenderFailed("lost".to_string()));
        assert!(result.unwrap_err().to_string().contains("lost"));
    }

    #[test]
    fn test_layer_frames_offset() {
        let clock = ManualClock::new(0.0);
        let button = laid_out(&clock);
        let frames = layer_frames(&button);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], frames[1]);
        assert!(frames[0].contains(Point::new(70.0, 80.0)));
    }
}
