//! Output module
//!
//! Serves the map page and streams frames to it:
//! - Browser page, map image, avatar images and points (HTTP)
//! - Frame stream (SSE)

pub mod browser;
pub mod sse;
