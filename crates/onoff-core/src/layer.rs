//! Retained shape layers with keyed property animations.
//!
//! A layer keeps two views of each animatable property:
//! - the model value, which is what was last assigned;
//! - the presentation value, which is what is on screen at a given time
//!   while an animation is running.

use crate::animation::{AnimationKey, BasicAnimation, IMPLICIT_DURATION};
use crate::paths::MITER_LIMIT;
use crate::timing::TimingFunction;
use kurbo::{Affine, BezPath, Cap, Point, Rect};
use peniko::Color;
use std::collections::HashMap;

/// Animatable values of a layer sampled at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSnapshot {
    pub stroke_start: f64,
    pub stroke_end: f64,
    pub line_width: f64,
}

impl LayerSnapshot {
    pub fn get(&self, key: AnimationKey) -> f64 {
        match key {
            AnimationKey::StrokeStart => self.stroke_start,
            AnimationKey::StrokeEnd => self.stroke_end,
            AnimationKey::LineWidth => self.line_width,
        }
    }

    fn set(&mut self, key: AnimationKey, value: f64) {
        match key {
            AnimationKey::StrokeStart => self.stroke_start = value,
            AnimationKey::StrokeEnd => self.stroke_end = value,
            AnimationKey::LineWidth => self.line_width = value,
        }
    }
}

/// A stroked path placed in its parent's coordinate space.
#[derive(Debug, Clone)]
pub struct ShapeLayer {
    /// Path in layer-local coordinates.
    pub path: BezPath,
    /// Layer-local rectangle the path lives in.
    pub bounds: Rect,
    /// Where the center of `bounds` sits in the parent.
    pub position: Point,
    pub stroke_color: Color,
    pub line_cap: Cap,
    pub miter_limit: f64,
    model: LayerSnapshot,
    animations: HashMap<AnimationKey, BasicAnimation>,
    actions_disabled: bool,
    attached: bool,
}

impl Default for ShapeLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeLayer {
    pub fn new() -> Self {
        Self {
            path: BezPath::new(),
            bounds: Rect::ZERO,
            position: Point::ZERO,
            stroke_color: Color::BLACK,
            line_cap: Cap::Butt,
            miter_limit: MITER_LIMIT,
            model: LayerSnapshot {
                stroke_start: 0.0,
                stroke_end: 1.0,
                line_width: 1.0,
            },
            animations: HashMap::new(),
            actions_disabled: false,
            attached: false,
        }
    }

    /// Mark the layer as part of a visible tree.
    ///
    /// Detached layers never create implicit animations.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.attached = false;
        self.animations.clear();
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Committed value of `key`.
    pub fn value(&self, key: AnimationKey) -> f64 {
        self.model.get(key)
    }

    pub fn stroke_start(&self) -> f64 {
        self.model.stroke_start
    }

    pub fn stroke_end(&self) -> f64 {
        self.model.stroke_end
    }

    pub fn line_width(&self) -> f64 {
        self.model.line_width
    }

    pub fn model(&self) -> LayerSnapshot {
        self.model
    }

    /// Assign the committed value of `key`.
    ///
    /// On an attached layer with actions enabled this also starts an implicit
    /// animation from the current presentation value.
    pub fn set_value(&mut self, key: AnimationKey, value: f64, now: f64) {
        let previous = self.model.get(key);
        if previous == value {
            return;
        }
        if self.attached && !self.actions_disabled {
            let from = self.presentation_value(key, now);
            let implicit = BasicAnimation::new(key, value)
                .from_value(from)
                .duration(IMPLICIT_DURATION)
                .timing(TimingFunction::DEFAULT)
                .begin_time(now);
            log::trace!("implicit {} {from} -> {value}", key.key_path());
            self.animations.insert(key, implicit);
        }
        self.model.set(key, value);
    }

    /// Run `f` with implicit animations turned off.
    pub fn perform_without_actions<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.actions_disabled;
        self.actions_disabled = true;
        let result = f(self);
        self.actions_disabled = previous;
        result
    }

    pub fn actions_disabled(&self) -> bool {
        self.actions_disabled
    }

    /// Register `animation` under its key path, replacing whatever was running
    /// there.
    pub fn add_animation(&mut self, animation: BasicAnimation) {
        self.animations.insert(animation.key, animation);
    }

    pub fn animation(&self, key: AnimationKey) -> Option<&BasicAnimation> {
        self.animations.get(&key)
    }

    pub fn remove_animation(&mut self, key: AnimationKey) -> Option<BasicAnimation> {
        self.animations.remove(&key)
    }

    pub fn remove_all_animations(&mut self) {
        self.animations.clear();
    }

    pub fn animation_keys(&self) -> impl Iterator<Item = AnimationKey> + '_ {
        self.animations.keys().copied()
    }

    /// Drop animations that ended at or before `now`.
    pub fn prune_finished(&mut self, now: f64) {
        self.animations.retain(|_, anim| !anim.is_finished(now));
    }

    pub fn has_running(&self, now: f64) -> bool {
        self.animations.values().any(|anim| !anim.is_finished(now))
    }

    /// On-screen value of `key` at `now`.
    pub fn presentation_value(&self, key: AnimationKey, now: f64) -> f64 {
        let model = self.model.get(key);
        match self.animations.get(&key) {
            Some(anim) => anim.sample(model, now),
            None => model,
        }
    }

    /// All animatable values as they appear at `now`.
    pub fn presentation(&self, now: f64) -> LayerSnapshot {
        let mut snapshot = self.model;
        for (key, anim) in &self.animations {
            snapshot.set(*key, anim.sample(self.model.get(*key), now));
        }
        snapshot
    }

    /// Start `animation` from what is currently on screen.
    ///
    /// When no `from` is given, the presentation value at `now` is used, so an
    /// animation that interrupts another continues without a jump. The model
    /// value is then set to the target with actions disabled.
    pub fn apply_animation(&mut self, animation: &BasicAnimation, now: f64) {
        let mut copy = animation.clone();
        if copy.from.is_none() {
            copy.from = Some(self.presentation_value(copy.key, now));
        }
        if copy.begin_time.is_none() {
            copy.begin_time = Some(now);
        }
        log::trace!(
            "animate {} {:?} -> {} over {}s",
            copy.key.key_path(),
            copy.from,
            copy.to,
            copy.duration
        );
        let (key, to) = (copy.key, copy.to);
        self.add_animation(copy);
        self.perform_without_actions(|layer| layer.set_value(key, to, now));
    }

    /// The layer's rectangle in its parent's coordinates.
    pub fn frame(&self) -> Rect {
        Rect::from_center_size(self.position, self.bounds.size())
    }

    /// Maps layer-local points to the parent's coordinates.
    pub fn to_parent(&self) -> Affine {
        Affine::translate(self.position - self.bounds.center())
    }
}
