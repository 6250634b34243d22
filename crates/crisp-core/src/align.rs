//! Device-pixel alignment for axis-aligned strokes.
//!
//! Canvas coordinates address the boundaries between pixel rows, not their
//! centres. A stroke lands on whole device pixels only when its width is an
//! integer number of device pixels and its centreline sits where that width
//! covers complete rows. Anything else is smeared across neighbouring rows
//! by anti-aliasing.
//!
//! Off-screen layers are sized in device pixels, so one unit of their
//! coordinate space is one physical pixel. Coordinates arrive in logical
//! units and are nudged *before* scaling. That ordering is only exact for
//! integral scale factors; see [`ScaleFactor::is_integral`].

use crate::surface::DrawingContext;
use kurbo::{Affine, Line, Point};

/// Device pixels per logical pixel. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub const ONE: Self = Self(1.0);

    /// Returns `None` for zero, negative, NaN, or infinite ratios.
    pub fn new(ratio: f64) -> Option<Self> {
        (ratio.is_finite() && ratio > 0.0).then_some(Self(ratio))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Whether half a logical pixel maps to a whole number of half device
    /// pixels. Nudging is exact only in that case.
    pub fn is_integral(self) -> bool {
        self.0.fract() == 0.0
    }

    /// Device-pixel extent of a logical dimension: `round(scale × logical)`.
    pub fn device_len(self, logical: u32) -> u32 {
        (self.0 * logical as f64).round() as u32
    }

    /// Integer device-pixel line width for a logical thickness, never
    /// below one device pixel.
    pub fn line_width(self, logical_thickness: f64) -> u32 {
        ((logical_thickness * self.0).round() as u32).max(1)
    }

    pub fn to_device(self, p: Point) -> Point {
        Point::new(p.x * self.0, p.y * self.0)
    }

    /// Transform for the on-screen context so a full-resolution layer drawn
    /// 1:1 comes out at logical size.
    pub fn compensating_transform(self) -> Affine {
        Affine::scale(1.0 / self.0)
    }
}

/// Shift a logical coordinate so a stroke `device_thickness` pixels wide
/// covers whole rows: odd widths keep the coordinate, even widths move it
/// half a unit.
pub fn nudge(coordinate: f64, device_thickness: u32) -> f64 {
    if device_thickness % 2 == 0 {
        coordinate + 0.5
    } else {
        coordinate
    }
}

/// Nudge both endpoints in logical units, then convert to device pixels.
pub fn aligned_segment(scale: ScaleFactor, device_thickness: u32, from: Point, to: Point) -> Line {
    let place = |p: Point| {
        scale.to_device(Point::new(
            nudge(p.x, device_thickness),
            nudge(p.y, device_thickness),
        ))
    };
    Line::new(place(from), place(to))
}

/// Append an aligned segment to the context's current path.
///
/// Does not begin or stroke the path, so several segments can share one
/// `stroke()` call.
pub fn draw_aligned_line<C: DrawingContext + ?Sized>(
    ctx: &mut C,
    scale: ScaleFactor,
    device_thickness: u32,
    from: Point,
    to: Point,
) {
    let line = aligned_segment(scale, device_thickness, from, to);
    log::trace!(
        "aligned line ({}, {}) -> ({}, {}) width {device_thickness}",
        line.p0.x,
        line.p0.y,
        line.p1.x,
        line.p1.y
    );
    ctx.move_to(line.p0.x, line.p0.y);
    ctx.line_to(line.p1.x, line.p1.y);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALES: [f64; 5] = [0.5, 1.0, 1.5, 2.0, 3.0];

    #[test]
    fn rejects_non_positive_ratios() {
        assert!(ScaleFactor::new(0.0).is_none());
        assert!(ScaleFactor::new(-2.0).is_none());
        assert!(ScaleFactor::new(f64::NAN).is_none());
        assert!(ScaleFactor::new(f64::INFINITY).is_none());
        assert_eq!(ScaleFactor::new(2.0).map(ScaleFactor::get), Some(2.0));
    }

    #[test]
    fn line_width_rounds_and_never_drops_below_one() {
        for ratio in SCALES {
            let scale = ScaleFactor::new(ratio).unwrap();
            for thickness in 1..=8u32 {
                let expected = (thickness as f64 * ratio).round() as u32;
                let width = scale.line_width(thickness as f64);
                assert_eq!(width, expected.max(1), "t={thickness} scale={ratio}");
                assert!(width >= 1);
            }
        }
        assert_eq!(ScaleFactor::ONE.line_width(0.2), 1);
        assert_eq!(ScaleFactor::new(1.5).unwrap().line_width(1.0), 2);
    }

    #[test]
    fn nudge_depends_only_on_parity() {
        for q in -20..=20 {
            let q = q as f64;
            for t in 1..=9u32 {
                let expected = if t % 2 == 0 { q + 0.5 } else { q };
                assert_eq!(nudge(q, t), expected);
            }
        }
    }

    #[test]
    fn device_len_rounds_half_away_from_zero() {
        let scale = ScaleFactor::new(1.5).unwrap();
        assert_eq!(scale.device_len(1), 2);
        assert_eq!(scale.device_len(3), 5);
        assert_eq!(scale.device_len(100), 150);
    }

    #[test]
    fn segment_is_nudged_before_scaling() {
        let scale = ScaleFactor::new(2.0).unwrap();
        let line = aligned_segment(scale, 2, Point::new(90.0, 100.0), Point::new(110.0, 100.0));
        assert_eq!(line.p0, Point::new(181.0, 201.0));
        assert_eq!(line.p1, Point::new(221.0, 201.0));

        let line = aligned_segment(scale, 3, Point::new(90.0, 100.0), Point::new(110.0, 100.0));
        assert_eq!(line.p0, Point::new(180.0, 200.0));
    }

    #[test]
    fn integral_scales() {
        assert!(ScaleFactor::ONE.is_integral());
        assert!(ScaleFactor::new(3.0).unwrap().is_integral());
        assert!(!ScaleFactor::new(1.5).unwrap().is_integral());
    }

    #[test]
    fn compensating_transform_inverts_scale() {
        let scale = ScaleFactor::new(2.0).unwrap();
        let p = scale.compensating_transform() * Point::new(200.0, 120.0);
        assert_eq!(p, Point::new(100.0, 60.0));
    }
}
