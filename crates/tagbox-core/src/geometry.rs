//! Small geometry helpers shared by hit testing and connection routing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Shortest distance from `p` to the segment `a`–`b`.
/// Degenerate segments collapse to point distance.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Whether `p` is within `tolerance` of any segment of `polyline`.
pub fn near_polyline(p: Point, polyline: &[Point], tolerance: f32) -> bool {
    polyline
        .windows(2)
        .any(|seg| distance_to_segment(p, seg[0], seg[1]) <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_horizontal_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!((distance_to_segment(Point::new(50.0, 4.0), a, b) - 4.0).abs() < 1e-4);
        // Beyond the end clamps to the endpoint
        assert!((distance_to_segment(Point::new(103.0, 4.0), a, b) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_segment() {
        let a = Point::new(10.0, 10.0);
        assert!((distance_to_segment(Point::new(13.0, 14.0), a, a) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn polyline_tolerance() {
        let line = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 50.0),
        ];
        assert!(near_polyline(Point::new(52.0, 25.0), &line, 3.0));
        assert!(!near_polyline(Point::new(25.0, 25.0), &line, 3.0));
    }
}
