//! Pixel-space geometry

use glam::Vec2;
use serde::Serialize;

/// Linear interpolation between two positions.
///
/// Evaluated per component as `start + (end - start) * t`.
pub fn lerp(start: Vec2, end: Vec2, t: f32) -> Vec2 {
    Vec2::new(
        start.x + (end.x - start.x) * t,
        start.y + (end.y - start.y) * t,
    )
}

/// Rescale one pixel coordinate after the map changed size.
///
/// A zero previous dimension falls back to dividing by the new one.
pub fn rescale(value: f32, previous: f32, current: f32) -> f32 {
    let divisor = if previous > 0.0 { previous } else { current };
    value / divisor * current
}

/// Axis-aligned rectangle in map pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Square of edge `size` centered on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        Self {
            x: center.x - size / 2.0,
            y: center.y - size / 2.0,
            width: size,
            height: size,
        }
    }

    /// Box of `size` centered horizontally on `anchor`, with its bottom edge
    /// `lift` pixels above the anchor.
    pub fn above(anchor: Vec2, size: Vec2, lift: f32) -> Self {
        Self {
            x: anchor.x - size.x / 2.0,
            y: anchor.y - lift - size.y,
            width: size.x,
            height: size.y,
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_boundaries() {
        let start = Vec2::new(12.5, 300.1);
        let end = Vec2::new(801.3, 44.7);

        assert_eq!(lerp(start, end, 0.0), start);

        let expected = Vec2::new(
            start.x + (end.x - start.x) * 1.0,
            start.y + (end.y - start.y) * 1.0,
        );
        assert_eq!(lerp(start, end, 1.0), expected);
    }

    #[test]
    fn test_lerp_midpoint() {
        let p = lerp(Vec2::ZERO, Vec2::new(100.0, 50.0), 0.5);
        assert_eq!(p, Vec2::new(50.0, 25.0));
    }

    #[test]
    fn test_rescale() {
        assert_eq!(rescale(50.0, 100.0, 200.0), 100.0);
        // Unknown previous size leaves the coordinate in place
        assert_eq!(rescale(50.0, 0.0, 200.0), 50.0);
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::centered(Vec2::new(100.0, 100.0), 40.0);
        assert!(r.contains(Vec2::new(100.0, 100.0)));
        assert!(r.contains(Vec2::new(80.0, 120.0)));
        assert!(!r.contains(Vec2::new(79.0, 100.0)));

        let popup = Rect::above(Vec2::new(100.0, 100.0), Vec2::new(200.0, 80.0), 28.0);
        assert_eq!(popup.x, 0.0);
        assert_eq!(popup.y, -8.0);
        assert!(popup.contains(Vec2::new(150.0, 50.0)));
        assert!(!popup.contains(Vec2::new(150.0, 100.0)));
    }
}
