//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer, StrokeCommand, button_strokes, layer_frames};
use kurbo::{Affine, Stroke};
use peniko::Color;
use vello::Scene;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Color of the layer frame outlines.
    bounds_color: Color,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            bounds_color: Color::from_rgba8(59, 130, 246, 255),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn render_stroke(&mut self, command: &StrokeCommand) {
        self.scene.stroke(
            &command.stroke,
            command.transform,
            command.color,
            None,
            &command.path,
        );
    }

    fn render_layer_bounds(&mut self, ctx: &RenderContext) {
        let view = ctx.view_transform();
        let stroke_width = 1.0 / ctx.scale_factor.max(f64::EPSILON);
        let dash_len = 4.0 * stroke_width;
        let stroke = Stroke::new(stroke_width).with_dashes(0.0, &[dash_len, dash_len]);
        for frame in layer_frames(ctx.button) {
            self.scene.stroke(&stroke, view, self.bounds_color, None, &frame);
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();

        let now = ctx.button.now();
        let commands = button_strokes(ctx.button, now, ctx.view_transform());
        log::trace!("Building scene with {} strokes at t={:.3}", commands.len(), now);
        for command in &commands {
            self.render_stroke(command);
        }

        if ctx.show_layer_bounds {
            self.render_layer_bounds(ctx);
        }
    }
}
