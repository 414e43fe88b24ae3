//! Map module
//!
//! Normalized map points and pixel-space geometry helpers.

pub mod geometry;
pub mod points;

pub use geometry::{lerp, Rect};
pub use points::{MapPoint, PointStore, PointsDocument};
