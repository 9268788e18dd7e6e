//! Cubic bezier timing curves.

use kurbo::{CubicBez, ParamCurve, ParamCurveDeriv, Point};
use serde::{Deserialize, Serialize};

const SOLVE_EPSILON: f64 = 1e-7;
const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 64;

/// A timing curve through (0, 0) and (1, 1) with two control points.
///
/// The y coordinates of the control points may leave `[0, 1]`, which gives
/// overshoot or anticipation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingFunction {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Default for TimingFunction {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TimingFunction {
    pub const LINEAR: Self = Self::new_const(0.0, 0.0, 1.0, 1.0);
    /// Curve used for implicit animations.
    pub const DEFAULT: Self = Self::new_const(0.25, 0.1, 0.25, 1.0);
    pub const EASE_IN_OUT: Self = Self::new_const(0.42, 0.0, 0.58, 1.0);

    const fn new_const(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a curve from its two control points.
    ///
    /// The x coordinates are clamped to `[0, 1]` so the curve stays a function
    /// of time.
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    fn curve(&self) -> CubicBez {
        CubicBez::new(
            Point::ZERO,
            Point::new(self.x1, self.y1),
            Point::new(self.x2, self.y2),
            Point::new(1.0, 1.0),
        )
    }

    /// Eased value for a linear progress in `[0, 1]`.
    pub fn evaluate(&self, progress: f64) -> f64 {
        if progress <= 0.0 {
            return 0.0;
        }
        if progress >= 1.0 {
            return 1.0;
        }
        if *self == Self::LINEAR {
            return progress;
        }
        let curve = self.curve();
        let t = solve_for_x(&curve, progress);
        curve.eval(t).y
    }
}

/// Find the curve parameter whose x coordinate equals `x`.
fn solve_for_x(curve: &CubicBez, x: f64) -> f64 {
    let deriv = curve.deriv();

    let mut t = x;
    for _ in 0..NEWTON_ITERATIONS {
        let error = curve.eval(t).x - x;
        if error.abs() < SOLVE_EPSILON {
            return t;
        }
        let slope = deriv.eval(t).x;
        if slope.abs() < 1e-6 {
            break;
        }
        t -= error / slope;
    }

    // x(t) is monotonic for control x in [0, 1]
    let mut lo = 0.0;
    let mut hi = 1.0;
    t = x;
    for _ in 0..BISECTION_ITERATIONS {
        let value = curve.eval(t).x;
        if (value - x).abs() < SOLVE_EPSILON {
            break;
        }
        if value < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) * 0.5;
    }
    t
}
