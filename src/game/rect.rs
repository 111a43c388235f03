//! Axis-aligned rectangle used for collision and draw bounds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rectangle with top-left origin; +Y points down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Same rectangle moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Origin and size multiplied per-axis by `scale`.
    pub fn scaled(&self, scale: Vec2) -> Self {
        Self::new(
            self.x * scale.x,
            self.y * scale.y,
            self.w * scale.x,
            self.h * scale.y,
        )
    }

    /// Shared region of two rectangles.
    ///
    /// The result's width/height are non-positive when the rectangles do
    /// not overlap on that axis; zero means edge contact. Callers decide
    /// which of the two counts as a hit.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Strict overlap on both axes.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let shared = self.intersection(other);
        shared.w > 0.0 && shared.h > 0.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_of_overlapping_rects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(6.0, 4.0, 10.0, 10.0);

        let shared = a.intersection(&b);
        assert_eq!(shared, Rect::new(6.0, 4.0, 4.0, 6.0));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn intersection_of_disjoint_rects_is_negative() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 5.0, 5.0);

        let shared = a.intersection(&b);
        assert!(shared.w < 0.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn edge_contact_has_zero_extent() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 10.0, 10.0, 10.0);

        let shared = a.intersection(&b);
        assert_eq!(shared.h, 0.0);
        assert!(shared.w > 0.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn scaled_scales_origin_and_size() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0).scaled(Vec2::new(10.0, 10.0));
        assert_eq!(r, Rect::new(10.0, 20.0, 30.0, 40.0));
    }
}
