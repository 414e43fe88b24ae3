//! Avatar module
//!
//! Per-avatar motion state, the engine that advances it, and image lookup.

pub mod assets;
pub mod engine;
pub mod state;

pub use assets::AvatarAssets;
pub use engine::MotionEngine;
pub use state::{AvatarState, MotionPhase};
