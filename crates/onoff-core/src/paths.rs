//! Glyph and ring geometry.
//!
//! The glyph is a checkmark whose tail continues into a circle. The toggle
//! animation moves the visible stroke window between the checkmark part and
//! the circle part of the same path.

use kurbo::{
    Affine, BezPath, Cap, Join, ParamCurve, ParamCurveArclen, PathSeg, Point, Rect,
    Shape as KurboShape, Stroke, StrokeOpts, Vec2,
};

/// Miter limit shared by both layers.
pub const MITER_LIMIT: f64 = 10.0;

/// Tolerance used when expanding strokes.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Accuracy for arc length queries when trimming.
const ARCLEN_ACCURACY: f64 = 1e-4;

/// The decorative glyph in its design space (roughly 76×76 units).
pub fn glyph_path() -> BezPath {
    let mut path = BezPath::new();
    path.move_to((60.48, 17.5));
    path.line_to((31.63, 46.34));
    path.line_to((5.05, 19.76));
    path.curve_to((13.84, 2.51), (34.92, -4.33), (52.15, 4.44));
    path.curve_to((69.37, 13.22), (76.22, 34.3), (67.44, 51.53));
    path.curve_to((58.67, 68.75), (37.59, 75.6), (20.36, 66.82));
    path.curve_to((3.14, 58.05), (-3.71, 36.97), (5.07, 19.74));
    path
}

/// Control point distance for a quarter ellipse, as a fraction of the radius.
const KAPPA: f64 = 0.552_284_749_8;

/// An oval inscribed in `frame`, built from four cubic quarters.
///
/// The quarter endpoints sit on the frame edges, so the path bounds equal
/// `frame` exactly.
pub fn ring_path(frame: Rect) -> BezPath {
    let frame = frame.abs();
    let Point { x: cx, y: cy } = frame.center();
    let rx = frame.width() / 2.0;
    let ry = frame.height() / 2.0;
    let kx = rx * KAPPA;
    let ky = ry * KAPPA;

    let mut path = BezPath::new();
    path.move_to((cx + rx, cy));
    path.curve_to((cx + rx, cy + ky), (cx + kx, cy + ry), (cx, cy + ry));
    path.curve_to((cx - kx, cy + ry), (cx - rx, cy + ky), (cx - rx, cy));
    path.curve_to((cx - rx, cy - ky), (cx - kx, cy - ry), (cx, cy - ry));
    path.curve_to((cx + kx, cy - ry), (cx + rx, cy - ky), (cx + rx, cy));
    path.close_path();
    path
}

/// Scale `path` uniformly so it fits `frame`, centered on the axis that has
/// room to spare.
///
/// A flat path is scaled by its non-zero dimension. Returns the original path
/// when the path bounds are empty in both dimensions or the frame is
/// degenerate.
pub fn rescale_for_frame(path: &BezPath, frame: Rect) -> BezPath {
    match fit_transform(path.bounding_box(), frame) {
        Some(transform) => {
            let mut scaled = path.clone();
            scaled.apply_affine(transform);
            scaled
        }
        None => path.clone(),
    }
}

/// The transform used by [`rescale_for_frame`].
///
/// The centering offset is applied before the scale, so it is expressed in
/// source units (divided by the scale factor).
pub fn fit_transform(bounding_box: Rect, frame: Rect) -> Option<Affine> {
    let source = bounding_box.size();
    let target = frame.size();
    if source.width <= 0.0 && source.height <= 0.0 {
        return None;
    }
    if !(target.width.is_finite() && target.height.is_finite()) {
        return None;
    }

    // source.w / source.h > target.w / target.h, without dividing by zero
    let width_limited = source.width * target.height > target.width * source.height;
    let scale = if width_limited {
        target.width / source.width
    } else {
        target.height / source.height
    };
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }

    let scaled_width = source.width * scale;
    let scaled_height = source.height * scale;
    let center_offset = Vec2::new(
        (target.width - scaled_width) / (scale * 2.0),
        (target.height - scaled_height) / (scale * 2.0),
    );

    Some(
        Affine::translate(frame.origin().to_vec2())
            * Affine::scale(scale)
            * Affine::translate(-bounding_box.origin().to_vec2())
            * Affine::translate(center_offset),
    )
}

/// The stroke style used for both layers.
pub fn stroke_style(line_width: f64) -> Stroke {
    Stroke::new(line_width)
        .with_caps(Cap::Round)
        .with_join(Join::Miter)
        .with_miter_limit(MITER_LIMIT)
}

/// Tight bounds of `path` once stroked with `line_width`.
///
/// The outline itself is only needed for its bounds and is dropped.
pub fn stroked_bounds(path: &BezPath, line_width: f64) -> Rect {
    let outline = kurbo::stroke(
        path.iter(),
        &stroke_style(line_width),
        &StrokeOpts::default(),
        PATH_TOLERANCE,
    );
    outline.bounding_box()
}

/// Total arc length of `path`.
pub fn path_length(path: &BezPath) -> f64 {
    path.segments().map(|seg| seg.arclen(ARCLEN_ACCURACY)).sum()
}

/// The part of `path` between the normalized arc length positions `start`
/// and `end`.
///
/// Both positions are clamped to `[0, 1]`. An empty path is returned when
/// nothing is visible.
pub fn trim_path(path: &BezPath, start: f64, end: f64) -> BezPath {
    let start = start.clamp(0.0, 1.0);
    let end = end.clamp(0.0, 1.0);
    let mut trimmed = BezPath::new();
    if end <= start {
        return trimmed;
    }

    let segments: Vec<(PathSeg, f64)> = path
        .segments()
        .map(|seg| (seg, seg.arclen(ARCLEN_ACCURACY)))
        .collect();
    let total: f64 = segments.iter().map(|(_, len)| len).sum();
    if total <= 0.0 {
        return trimmed;
    }

    let from = start * total;
    let to = end * total;
    let mut offset = 0.0;
    let mut pen: Option<Point> = None;

    for (seg, len) in segments {
        let seg_start = offset;
        let seg_end = offset + len;
        offset = seg_end;

        if len <= 0.0 || seg_end <= from || seg_start >= to {
            continue;
        }

        let t0 = if from > seg_start {
            seg.inv_arclen(from - seg_start, ARCLEN_ACCURACY)
        } else {
            0.0
        };
        let t1 = if to < seg_end {
            seg.inv_arclen(to - seg_start, ARCLEN_ACCURACY)
        } else {
            1.0
        };
        if t1 <= t0 {
            continue;
        }

        let piece = seg.subsegment(t0..t1);
        let piece_start = piece.start();
        let connected = pen.is_some_and(|p| (p - piece_start).hypot() < 1e-9);
        if !connected {
            trimmed.move_to(piece_start);
        }
        trimmed.push(piece.as_path_el());
        pen = Some(piece.end());
    }

    trimmed
}
