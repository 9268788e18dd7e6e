//! Timed property animations for shape layers.

use crate::timing::TimingFunction;
use serde::{Deserialize, Serialize};

/// Duration of implicit animations created by plain assignments.
pub const IMPLICIT_DURATION: f64 = 0.25;

/// An animatable scalar property of a shape layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationKey {
    StrokeStart,
    StrokeEnd,
    LineWidth,
}

impl AnimationKey {
    pub const ALL: [AnimationKey; 3] = [
        AnimationKey::StrokeStart,
        AnimationKey::StrokeEnd,
        AnimationKey::LineWidth,
    ];

    /// Name of the slot the animation is registered under.
    pub fn key_path(self) -> &'static str {
        match self {
            AnimationKey::StrokeStart => "strokeStart",
            AnimationKey::StrokeEnd => "strokeEnd",
            AnimationKey::LineWidth => "lineWidth",
        }
    }

    pub fn from_key_path(key_path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.key_path() == key_path)
    }
}

/// Interpolates one property from `from` to `to`.
///
/// A missing `from` or `begin_time` is filled in when the animation is added
/// to a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicAnimation {
    pub key: AnimationKey,
    pub from: Option<f64>,
    pub to: f64,
    /// Duration in seconds.
    pub duration: f64,
    pub timing: TimingFunction,
    pub begin_time: Option<f64>,
}

impl BasicAnimation {
    pub fn new(key: AnimationKey, to: f64) -> Self {
        Self {
            key,
            from: None,
            to,
            duration: IMPLICIT_DURATION,
            timing: TimingFunction::DEFAULT,
            begin_time: None,
        }
    }

    pub fn from_value(mut self, from: f64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = seconds.max(0.0);
        self
    }

    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }

    pub fn begin_time(mut self, seconds: f64) -> Self {
        self.begin_time = Some(seconds);
        self
    }

    /// Linear progress at `now`, in `[0, 1]`.
    pub fn progress(&self, now: f64) -> f64 {
        let begin = self.begin_time.unwrap_or(now);
        if self.duration <= 0.0 {
            return if now >= begin { 1.0 } else { 0.0 };
        }
        ((now - begin) / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        match self.begin_time {
            Some(begin) => now >= begin + self.duration,
            None => false,
        }
    }

    /// The animated value at `now`.
    ///
    /// Once finished the animation no longer contributes and `model` is
    /// returned.
    pub fn sample(&self, model: f64, now: f64) -> f64 {
        if self.is_finished(now) {
            return model;
        }
        let from = self.from.unwrap_or(model);
        let eased = self.timing.evaluate(self.progress(now));
        from + (self.to - from) * eased
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_paths_roundtrip() {
        for key in AnimationKey::ALL {
            assert_eq!(AnimationKey::from_key_path(key.key_path()), Some(key));
        }
        assert_eq!(AnimationKey::from_key_path("opacity"), None);
    }

    #[test]
    fn test_sample_linear() {
        let anim = BasicAnimation::new(AnimationKey::StrokeEnd, 1.0)
            .from_value(0.0)
            .duration(2.0)
            .timing(TimingFunction::LINEAR)
            .begin_time(10.0);
        assert_eq!(anim.sample(1.0, 9.0), 0.0);
        assert!((anim.sample(1.0, 10.5) - 0.25).abs() < 1e-9);
        assert!((anim.sample(1.0, 11.0) - 0.5).abs() < 1e-9);
        assert!(anim.is_finished(12.0));
        assert_eq!(anim.sample(0.7, 12.5), 0.7);
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let anim = BasicAnimation::new(AnimationKey::LineWidth, 4.0)
            .from_value(1.0)
            .duration(0.0)
            .begin_time(0.0);
        assert!(anim.is_finished(0.0));
        assert_eq!(anim.sample(4.0, 0.0), 4.0);
    }

    #[test]
    fn test_negative_duration_clamped() {
        let anim = BasicAnimation::new(AnimationKey::StrokeStart, 0.5).duration(-1.0);
        assert_eq!(anim.duration, 0.0);
    }
}
