//! Vector math re-exported from [`glam`].
//!
//! Pointer positions coming from the host are [`Vec2`]s in screen space.

pub use glam::{Vec2, vec2};

use crate::geometry::Pos;

impl From<Vec2> for Pos<f32> {
    fn from(v: Vec2) -> Self {
        Pos { x: v.x, y: v.y }
    }
}

impl From<Pos<f32>> for Vec2 {
    fn from(p: Pos<f32>) -> Self {
        Vec2::new(p.x, p.y)
    }
}

impl From<mint::Point2<f32>> for Pos<f32> {
    fn from(p: mint::Point2<f32>) -> Self {
        Pos { x: p.x, y: p.y }
    }
}

impl From<Pos<f32>> for mint::Point2<f32> {
    fn from(p: Pos<f32>) -> Self {
        mint::Point2 { x: p.x, y: p.y }
    }
}
