//! Rectangle UI primitive and hit testing.
//!
//! Rectangles are axis-aligned and expressed in screen pixels with the origin
//! at the top-left corner, the same space touch samples arrive in.

use cgmath::{Point2, Vector2};

/// An axis-aligned rectangle in screen pixels.
///
/// Stored as its minimum and maximum corners. The center/half-dimension form
/// is available through [`Rect::from_center_half_dim`], [`Rect::center`] and
/// [`Rect::half_dim`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Corner with the smallest coordinates
    pub min: Point2<f32>,
    /// Corner with the largest coordinates
    pub max: Point2<f32>,
}

impl Rect {
    /// Creates a rectangle from two opposite corners.
    ///
    /// The corners may be given in any order; they are sorted per axis so that
    /// `min <= max` always holds.
    pub fn from_min_max(a: Point2<f32>, b: Point2<f32>) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates a rectangle from raw corner coordinates `(x0, y0) - (x1, y1)`.
    pub fn from_coords(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::from_min_max(Point2::new(x0, y0), Point2::new(x1, y1))
    }

    /// Creates a rectangle from its center and half extents.
    ///
    /// Negative half extents are treated as their absolute value.
    pub fn from_center_half_dim(center: Point2<f32>, half_dim: Vector2<f32>) -> Self {
        let half_dim = Vector2::new(half_dim.x.abs(), half_dim.y.abs());
        Self {
            min: center - half_dim,
            max: center + half_dim,
        }
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Half of the rectangle's width and height.
    pub fn half_dim(&self) -> Vector2<f32> {
        (self.max - self.min) * 0.5
    }

    /// Returns `true` if `point` lies inside the rectangle.
    ///
    /// The lower bound is inclusive and the upper bound exclusive, so two
    /// rectangles sharing an edge never both contain a point on that edge.
    pub fn contains(&self, point: Point2<f32>) -> bool {
        point_in_rect(point, self)
    }
}

/// Half-open point-in-rectangle test: `min <= point < max` on both axes.
pub fn point_in_rect(point: Point2<f32>, rect: &Rect) -> bool {
    point.x >= rect.min.x && point.y >= rect.min.y && point.x < rect.max.x && point.y < rect.max.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect_100_100_50() -> Rect {
        Rect::from_center_half_dim(Point2::new(100.0, 100.0), Vector2::new(50.0, 50.0))
    }

    #[test]
    fn test_center_point_is_touched() {
        assert!(point_in_rect(Point2::new(100.0, 100.0), &rect_100_100_50()));
    }

    #[test]
    fn test_upper_bound_is_exclusive() {
        let rect = rect_100_100_50();
        assert!(!point_in_rect(Point2::new(151.0, 100.0), &rect));
        assert!(!point_in_rect(Point2::new(150.0, 100.0), &rect));
        assert!(point_in_rect(Point2::new(149.0, 100.0), &rect));
    }

    #[test]
    fn test_lower_bound_is_inclusive() {
        let rect = rect_100_100_50();
        assert!(rect.contains(Point2::new(50.0, 50.0)));
        assert!(!rect.contains(Point2::new(49.9, 50.0)));
    }

    #[test]
    fn test_forms_convert_both_ways() {
        let rect = Rect::from_coords(240.0, 20.0, 40.0, 220.0);
        assert_eq!(rect.min, Point2::new(40.0, 20.0));
        assert_eq!(rect.max, Point2::new(240.0, 220.0));

        let center = rect.center();
        let half_dim = rect.half_dim();
        assert_relative_eq!(center.x, 140.0);
        assert_relative_eq!(center.y, 120.0);
        assert_relative_eq!(half_dim.x, 100.0);
        assert_relative_eq!(half_dim.y, 100.0);

        assert_eq!(Rect::from_center_half_dim(center, half_dim), rect);
    }
}
