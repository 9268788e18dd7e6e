//! The on/off toggle button.
//!
//! The button owns two shape layers: the glyph (a checkmark running into a
//! circle) and a ring around it. Toggling moves the visible part of the glyph
//! stroke between the checkmark and the circle.

use crate::animation::{AnimationKey, BasicAnimation};
use crate::clock::{Clock, SystemClock};
use crate::config::ButtonConfig;
use crate::error::OnOffResult;
use crate::layer::ShapeLayer;
use crate::paths::{glyph_path, rescale_for_frame, ring_path, stroked_bounds};
use crate::timing::TimingFunction;
use kurbo::{Cap, Point, Rect, Size};
use peniko::Color;

/// Duration of a checked/unchecked transition, in seconds.
pub const TOGGLE_DURATION: f64 = 0.6;

/// Where the visible stroke window sits in one state, and how it gets there.
///
/// The stroke positions only make sense for [`glyph_path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToggleTrack {
    pub stroke_start: f64,
    pub stroke_end: f64,
    pub timing: TimingFunction,
}

impl ToggleTrack {
    /// Checkmark visible; slight overshoot on arrival.
    pub const CHECKED: Self = Self {
        stroke_start: 0.025,
        stroke_end: 0.20,
        timing: TimingFunction {
            x1: 0.75,
            y1: 0.1,
            x2: 0.50,
            y2: 1.38,
        },
    };

    /// Circle visible; short dip before leaving.
    pub const UNCHECKED: Self = Self {
        stroke_start: 0.268,
        stroke_end: 1.0,
        timing: TimingFunction {
            x1: 0.45,
            y1: -0.2,
            x2: 0.8,
            y2: 0.65,
        },
    };

    pub fn for_state(checked: bool) -> Self {
        if checked {
            Self::CHECKED
        } else {
            Self::UNCHECKED
        }
    }

    /// Stroke start and end animations towards this track.
    pub fn animations(&self, duration: f64) -> [BasicAnimation; 2] {
        [
            BasicAnimation::new(AnimationKey::StrokeStart, self.stroke_start)
                .duration(duration)
                .timing(self.timing),
            BasicAnimation::new(AnimationKey::StrokeEnd, self.stroke_end)
                .duration(duration)
                .timing(self.timing),
        ]
    }
}

/// Inputs the layer geometry was last derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GeometryKey {
    bounds: Rect,
    line_width: f64,
}

/// A circular on/off switch.
pub struct OnOffButton {
    frame: Rect,
    line_width: f64,
    stroke_color: Color,
    ring_alpha: f64,
    checked: bool,
    glyph_layer: Option<ShapeLayer>,
    ring_layer: Option<ShapeLayer>,
    geometry: Option<GeometryKey>,
    clock: Box<dyn Clock>,
}

impl Default for OnOffButton {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OnOffButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnOffButton")
            .field("frame", &self.frame)
            .field("line_width", &self.line_width)
            .field("stroke_color", &self.stroke_color)
            .field("ring_alpha", &self.ring_alpha)
            .field("checked", &self.checked)
            .field("has_layers", &self.glyph_layer.is_some())
            .finish()
    }
}

impl OnOffButton {
    /// Create a button with default parameters and no frame yet.
    pub fn new() -> Self {
        Self {
            frame: Rect::ZERO,
            line_width: 1.0,
            stroke_color: Color::WHITE,
            ring_alpha: 0.5,
            checked: true,
            glyph_layer: None,
            ring_layer: None,
            geometry: None,
            clock: Box::new(SystemClock::new()),
        }
    }

    /// Create a button from a validated config.
    pub fn from_config(config: &ButtonConfig) -> OnOffResult<Self> {
        config.validate()?;
        let mut button = Self::new();
        button.line_width = config.line_width;
        button.stroke_color = config.stroke_color.into();
        button.ring_alpha = config.ring_alpha;
        button.checked = config.checked;
        Ok(button)
    }

    /// Replace the time source used for animations.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.set_frame(frame);
        self
    }

    /// Current time of the button's clock.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// The button's own coordinate space: its frame size at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.frame.size())
    }

    /// Move or resize the button. Layers follow on the next layout, which
    /// runs immediately.
    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
        self.layout();
    }

    pub fn set_size(&mut self, size: Size) {
        self.set_frame(Rect::from_origin_size(self.frame.origin(), size));
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Set the stroke width of both layers.
    ///
    /// Non-finite or non-positive widths are ignored.
    pub fn set_line_width(&mut self, line_width: f64) {
        if !line_width.is_finite() || line_width <= 0.0 {
            log::warn!("Ignoring invalid line width {line_width}");
            return;
        }
        self.line_width = line_width;
        self.layout();
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
        self.layout();
    }

    pub fn ring_alpha(&self) -> f64 {
        self.ring_alpha
    }

    /// Set the ring opacity, clamped to `[0, 1]`.
    pub fn set_ring_alpha(&mut self, ring_alpha: f64) {
        if ring_alpha.is_nan() {
            log::warn!("Ignoring NaN ring alpha");
            return;
        }
        self.ring_alpha = ring_alpha.clamp(0.0, 1.0);
        self.layout();
    }

    /// Stroke color with the ring alpha applied.
    pub fn ring_color(&self) -> Color {
        self.stroke_color.with_alpha(self.ring_alpha as f32)
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Set the state and animate the glyph stroke towards it.
    ///
    /// Assigning the current state again still restarts the animation.
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
        let now = self.clock.now();
        let Some(glyph) = self.glyph_layer.as_mut() else {
            log::debug!("checked = {checked} before layout, nothing to animate");
            return;
        };
        log::debug!("checked = {checked} at {now:.3}s");
        for animation in ToggleTrack::for_state(checked).animations(TOGGLE_DURATION) {
            glyph.apply_animation(&animation, now);
        }
    }

    /// Tap handler: flip the state.
    pub fn toggle(&mut self) {
        self.set_checked(!self.checked);
    }

    /// Toggle if `point` (in the parent's coordinates) lands on the button.
    pub fn handle_tap(&mut self, point: Point) -> bool {
        if !self.contains(point) {
            return false;
        }
        self.toggle();
        true
    }

    /// Whether `point` lies inside the ring, or inside the frame before the
    /// first layout. Frame corners outside the ring do not count.
    pub fn contains(&self, point: Point) -> bool {
        let Some(ring) = self.ring_layer.as_ref() else {
            return self.frame.contains(point);
        };
        let area = ring.frame() + self.frame.origin().to_vec2();
        let center = area.center();
        let rx = area.width() / 2.0;
        let ry = area.height() / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let dx = (point.x - center.x) / rx;
        let dy = (point.y - center.y) / ry;
        dx * dx + dy * dy <= 1.0
    }

    pub fn glyph_layer(&self) -> Option<&ShapeLayer> {
        self.glyph_layer.as_ref()
    }

    pub fn ring_layer(&self) -> Option<&ShapeLayer> {
        self.ring_layer.as_ref()
    }

    /// Whether any layer animation is still running.
    pub fn is_animating(&self) -> bool {
        let now = self.clock.now();
        self.glyph_layer.iter().chain(self.ring_layer.iter()).any(|layer| layer.has_running(now))
    }

    /// Drop finished animations. Call once per frame.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        for layer in self.glyph_layer.iter_mut().chain(self.ring_layer.iter_mut()) {
            layer.prune_finished(now);
        }
    }

    /// Derive layer geometry and refresh stroke parameters.
    ///
    /// Geometry is rebuilt on first layout and whenever the bounds or the line
    /// width changed; otherwise only colors and widths are refreshed. Does
    /// nothing while the bounds are empty.
    pub fn layout(&mut self) {
        let bounds = self.bounds();
        if bounds.is_zero_area() {
            return;
        }

        let key = GeometryKey {
            bounds,
            line_width: self.line_width,
        };
        if self.geometry != Some(key) {
            self.rebuild_geometry(bounds);
            self.geometry = Some(key);
        }
        self.refresh_properties();
    }

    fn rebuild_geometry(&mut self, bounds: Rect) {
        let path = rescale_for_frame(&glyph_path(), bounds);
        let glyph_bounds = stroked_bounds(&path, self.line_width);
        let position = glyph_bounds.center();
        log::debug!(
            "glyph geometry for {}x{} (line width {}): {:?}",
            bounds.width(),
            bounds.height(),
            self.line_width,
            glyph_bounds
        );

        if self.glyph_layer.is_none() {
            let mut glyph = self.new_shape_layer();
            let track = ToggleTrack::for_state(self.checked);
            glyph.set_value(AnimationKey::StrokeStart, track.stroke_start, 0.0);
            glyph.set_value(AnimationKey::StrokeEnd, track.stroke_end, 0.0);
            glyph.stroke_color = self.stroke_color;
            glyph.attach();
            self.glyph_layer = Some(glyph);
        }
        if let Some(glyph) = self.glyph_layer.as_mut() {
            glyph.path = path;
            glyph.bounds = glyph_bounds;
            glyph.position = position;
        }

        let half = self.line_width / 2.0;
        let ring_frame = if glyph_bounds.width() > self.line_width
            && glyph_bounds.height() > self.line_width
        {
            glyph_bounds.inflate(-half, -half)
        } else {
            Rect::from_center_size(position, Size::ZERO)
        };

        if self.ring_layer.is_none() {
            let mut ring = self.new_shape_layer();
            ring.stroke_color = self.ring_color();
            ring.attach();
            self.ring_layer = Some(ring);
        }
        if let Some(ring) = self.ring_layer.as_mut() {
            ring.path = ring_path(ring_frame);
            ring.bounds = glyph_bounds;
            ring.position = position;
        }
    }

    fn new_shape_layer(&self) -> ShapeLayer {
        let mut layer = ShapeLayer::new();
        layer.line_cap = Cap::Round;
        layer.set_value(AnimationKey::LineWidth, self.line_width, 0.0);
        layer
    }

    fn refresh_properties(&mut self) {
        let now = self.clock.now();
        let ring_color = self.ring_color();
        if let Some(glyph) = self.glyph_layer.as_mut() {
            glyph.set_value(AnimationKey::LineWidth, self.line_width, now);
            glyph.stroke_color = self.stroke_color;
        }
        if let Some(ring) = self.ring_layer.as_mut() {
            ring.set_value(AnimationKey::LineWidth, self.line_width, now);
            ring.stroke_color = ring_color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::SerializableColor;
    use crate::paths::path_length;
    use kurbo::Shape as KurboShape;

    const EPS: f64 = 1e-9;

    fn button_with_clock() -> (OnOffButton, ManualClock) {
        let clock = ManualClock::new(0.0);
        let button = OnOffButton::new()
            .with_clock(clock.clone())
            .with_frame(Rect::new(0.0, 0.0, 100.0, 100.0));
        (button, clock)
    }

    fn assert_rect_eq(a: Rect, b: Rect) {
        assert!((a.x0 - b.x0).abs() < 1e-6, "{a:?} != {b:?}");
        assert!((a.y0 - b.y0).abs() < 1e-6, "{a:?} != {b:?}");
        assert!((a.x1 - b.x1).abs() < 1e-6, "{a:?} != {b:?}");
        assert!((a.y1 - b.y1).abs() < 1e-6, "{a:?} != {b:?}");
    }

    #[test]
    fn test_defaults() {
        let button = OnOffButton::new();
        assert!((button.line_width() - 1.0).abs() < f64::EPSILON);
        assert!((button.ring_alpha() - 0.5).abs() < f64::EPSILON);
        assert!(button.is_checked());
        assert_eq!(
            SerializableColor::from(button.stroke_color()),
            SerializableColor::white()
        );
        assert!(button.glyph_layer().is_none());
        assert!(button.ring_layer().is_none());
    }

    #[test]
    fn test_zero_frame_skips_layout() {
        let mut button = OnOffButton::new();
        button.layout();
        button.set_frame(Rect::new(10.0, 10.0, 10.0, 60.0));
        assert!(button.glyph_layer().is_none());
        assert!(button.ring_layer().is_none());
    }

    #[test]
    fn test_layout_creates_matching_layers() {
        let (button, _) = button_with_clock();
        let glyph = button.glyph_layer().unwrap();
        let ring = button.ring_layer().unwrap();
        assert_eq!(glyph.bounds, ring.bounds);
        assert_eq!(glyph.position, ring.position);
        assert_eq!(glyph.position, glyph.bounds.center());
        assert!(glyph.is_attached() && ring.is_attached());
        assert_eq!(glyph.line_cap, Cap::Round);

        let inset = glyph.bounds.inflate(-0.5, -0.5);
        assert_rect_eq(ring.path.bounding_box(), inset);
    }

    #[test]
    fn test_glyph_centered_in_square_frame() {
        let (button, _) = button_with_clock();
        let glyph = button.glyph_layer().unwrap();
        assert!((glyph.position.x - 50.0).abs() < 1.0);
        assert!((glyph.position.y - 50.0).abs() < 1.0);
        assert!((glyph.bounds.width() - 100.0).abs() < 2.0);
        assert!((glyph.bounds.height() - 100.0).abs() < 2.0);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let (mut button, _) = button_with_clock();
        let before = button.glyph_layer().unwrap().clone();
        button.layout();
        button.layout();
        let glyph = button.glyph_layer().unwrap();
        assert_eq!(glyph.bounds, before.bounds);
        assert_eq!(glyph.position, before.position);
        assert_eq!(glyph.path, before.path);
        assert_eq!(glyph.animation_keys().count(), 0);
    }

    #[test]
    fn test_moving_frame_keeps_geometry() {
        let (mut button, _) = button_with_clock();
        let before = button.glyph_layer().unwrap().bounds;
        button.set_frame(Rect::new(200.0, 300.0, 300.0, 400.0));
        assert_eq!(button.glyph_layer().unwrap().bounds, before);
    }

    #[test]
    fn test_resize_rebuilds_both_layers() {
        let (mut button, _) = button_with_clock();
        button.set_size(Size::new(200.0, 200.0));
        let glyph = button.glyph_layer().unwrap();
        let ring = button.ring_layer().unwrap();
        assert!((glyph.bounds.width() - 200.0).abs() < 2.0);
        assert_eq!(ring.bounds, glyph.bounds);
        assert_eq!(ring.position, glyph.position);
        assert_rect_eq(ring.path.bounding_box(), glyph.bounds.inflate(-0.5, -0.5));
    }

    #[test]
    fn test_line_width_rebuilds_and_animates() {
        let (mut button, clock) = button_with_clock();
        let thin = button.glyph_layer().unwrap().bounds;
        clock.set(1.0);
        button.set_line_width(6.0);

        let glyph = button.glyph_layer().unwrap();
        assert!(glyph.bounds.width() > thin.width());
        assert_eq!(glyph.line_width(), 6.0);
        let implicit = glyph.animation(AnimationKey::LineWidth).unwrap();
        assert_eq!(implicit.from, Some(1.0));
        assert_eq!(implicit.begin_time, Some(1.0));

        let ring = button.ring_layer().unwrap();
        assert_eq!(ring.bounds, glyph.bounds);
        assert_rect_eq(ring.path.bounding_box(), glyph.bounds.inflate(-3.0, -3.0));
    }

    #[test]
    fn test_invalid_line_width_ignored() {
        let (mut button, _) = button_with_clock();
        button.set_line_width(0.0);
        button.set_line_width(-2.0);
        button.set_line_width(f64::NAN);
        assert!((button.line_width() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ring_alpha_clamped_and_applied() {
        let (mut button, _) = button_with_clock();
        button.set_ring_alpha(2.0);
        assert_eq!(button.ring_alpha(), 1.0);
        button.set_ring_alpha(0.25);
        let ring = button.ring_layer().unwrap();
        assert_eq!(ring.stroke_color.to_rgba8().a, 64);
    }

    #[test]
    fn test_stroke_color_refreshes_layers() {
        let (mut button, _) = button_with_clock();
        button.set_stroke_color(Color::from_rgba8(200, 10, 10, 255));
        let glyph_rgba = button.glyph_layer().unwrap().stroke_color.to_rgba8();
        let ring_rgba = button.ring_layer().unwrap().stroke_color.to_rgba8();
        assert_eq!((glyph_rgba.r, glyph_rgba.a), (200, 255));
        assert_eq!((ring_rgba.r, ring_rgba.a), (200, 128));
    }

    #[test]
    fn test_initial_stroke_matches_state() {
        let (button, _) = button_with_clock();
        let glyph = button.glyph_layer().unwrap();
        assert_eq!(glyph.stroke_start(), ToggleTrack::CHECKED.stroke_start);
        assert_eq!(glyph.stroke_end(), ToggleTrack::CHECKED.stroke_end);

        let config = ButtonConfig {
            checked: false,
            ..ButtonConfig::default()
        };
        let button = OnOffButton::from_config(&config)
            .unwrap()
            .with_clock(ManualClock::new(0.0))
            .with_frame(Rect::new(0.0, 0.0, 50.0, 50.0));
        let glyph = button.glyph_layer().unwrap();
        assert_eq!(glyph.stroke_start(), ToggleTrack::UNCHECKED.stroke_start);
        assert_eq!(glyph.stroke_end(), ToggleTrack::UNCHECKED.stroke_end);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = ButtonConfig {
            ring_alpha: -0.1,
            ..ButtonConfig::default()
        };
        assert!(OnOffButton::from_config(&config).is_err());
    }

    #[test]
    fn test_toggle_animates_to_unchecked() {
        let (mut button, _) = button_with_clock();
        button.toggle();
        assert!(!button.is_checked());

        let glyph = button.glyph_layer().unwrap();
        assert_eq!(glyph.stroke_start(), 0.268);
        assert_eq!(glyph.stroke_end(), 1.0);

        let start = glyph.animation(AnimationKey::StrokeStart).unwrap();
        assert_eq!(start.from, Some(0.025));
        assert_eq!(start.to, 0.268);
        assert!((start.duration - TOGGLE_DURATION).abs() < EPS);
        assert_eq!(start.timing, ToggleTrack::UNCHECKED.timing);

        let end = glyph.animation(AnimationKey::StrokeEnd).unwrap();
        assert_eq!(end.from, Some(0.20));
        assert_eq!(end.to, 1.0);
    }

    #[test]
    fn test_toggle_round_trip() {
        let (mut button, clock) = button_with_clock();
        let initial = button.glyph_layer().unwrap().model();
        button.toggle();
        clock.advance(1.0);
        button.toggle();
        let glyph = button.glyph_layer().unwrap();
        assert!(button.is_checked());
        assert_eq!(glyph.model(), initial);
        assert_eq!(
            glyph.animation(AnimationKey::StrokeStart).unwrap().timing,
            ToggleTrack::CHECKED.timing
        );

        clock.advance(1.0);
        assert_eq!(glyph.presentation(button.now()), initial);
        assert!(!button.is_animating());
    }

    #[test]
    fn test_interrupted_toggle_starts_from_presentation() {
        let (mut button, clock) = button_with_clock();
        button.toggle();
        clock.set(0.3);

        let glyph = button.glyph_layer().unwrap();
        let on_screen = glyph.presentation(0.3);
        let committed = glyph.model();
        assert!((on_screen.stroke_end - committed.stroke_end).abs() > 1e-3);

        button.toggle();
        let glyph = button.glyph_layer().unwrap();
        let start = glyph.animation(AnimationKey::StrokeStart).unwrap();
        let end = glyph.animation(AnimationKey::StrokeEnd).unwrap();
        assert!((start.from.unwrap() - on_screen.stroke_start).abs() < EPS);
        assert!((end.from.unwrap() - on_screen.stroke_end).abs() < EPS);
        assert!((end.from.unwrap() - committed.stroke_end).abs() > 1e-3);
        assert_eq!(start.begin_time, Some(0.3));

        // No jump at the moment of interruption
        let after = glyph.presentation(0.3);
        assert!((after.stroke_end - on_screen.stroke_end).abs() < EPS);
    }

    #[test]
    fn test_set_checked_before_layout() {
        let clock = ManualClock::new(0.0);
        let mut button = OnOffButton::new().with_clock(clock);
        button.set_checked(false);
        assert!(!button.is_checked());
        button.set_frame(Rect::new(0.0, 0.0, 40.0, 40.0));
        let glyph = button.glyph_layer().unwrap();
        assert_eq!(glyph.stroke_start(), ToggleTrack::UNCHECKED.stroke_start);
        assert_eq!(glyph.animation_keys().count(), 0);
    }

    #[test]
    fn test_reassigning_state_restarts_animation() {
        let (mut button, clock) = button_with_clock();
        clock.set(2.0);
        button.set_checked(true);
        let glyph = button.glyph_layer().unwrap();
        let anim = glyph.animation(AnimationKey::StrokeEnd).unwrap();
        assert_eq!(anim.begin_time, Some(2.0));
        assert_eq!(anim.from, Some(anim.to));
    }

    #[test]
    fn test_tick_prunes_finished() {
        let (mut button, clock) = button_with_clock();
        button.toggle();
        assert!(button.is_animating());
        clock.advance(TOGGLE_DURATION);
        button.tick();
        assert!(!button.is_animating());
        assert_eq!(button.glyph_layer().unwrap().animation_keys().count(), 0);
    }

    #[test]
    fn test_handle_tap() {
        let clock = ManualClock::new(0.0);
        let mut button = OnOffButton::new()
            .with_clock(clock)
            .with_frame(Rect::new(100.0, 100.0, 200.0, 200.0));
        assert!(!button.handle_tap(Point::new(101.0, 101.0)));
        assert!(button.is_checked());
        assert!(button.handle_tap(Point::new(150.0, 150.0)));
        assert!(!button.is_checked());
        assert!(!button.handle_tap(Point::new(20.0, 20.0)));
    }

    #[test]
    fn test_visible_glyph_is_shorter_when_checked() {
        let (button, _) = button_with_clock();
        let glyph = button.glyph_layer().unwrap();
        let total = path_length(&glyph.path);
        let visible =
            crate::paths::trim_path(&glyph.path, glyph.stroke_start(), glyph.stroke_end());
        let ratio = path_length(&visible) / total;
        assert!((ratio - (0.20 - 0.025)).abs() < 1e-3);
    }
}
