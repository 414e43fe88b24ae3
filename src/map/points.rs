//! Normalized map points loaded once at startup

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::{PointsError, WanderersError};

/// A point on the map as a fraction of the map's width and height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub x: f32,
    pub y: f32,
}

impl MapPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates lie in [0, 1]
    pub fn is_normalized(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    /// Absolute pixel position on a map of the given size
    pub fn to_pixels(&self, map_size: Vec2) -> Vec2 {
        Vec2::new(self.x * map_size.x, self.y * map_size.y)
    }
}

/// On-disk points document: `{"points": [{"x": .., "y": ..}, ...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsDocument {
    pub points: Vec<MapPoint>,
}

/// Immutable, validated set of map points
#[derive(Debug, Clone)]
pub struct PointStore {
    points: Arc<[MapPoint]>,
}

impl PointStore {
    /// Build a store from points, rejecting empty or out-of-range input
    pub fn new(points: Vec<MapPoint>) -> Result<Self, WanderersError> {
        if points.is_empty() {
            return Err(PointsError::Empty.into());
        }

        if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !p.is_normalized()) {
            return Err(PointsError::OutOfRange {
                index,
                x: p.x,
                y: p.y,
            }
            .into());
        }

        Ok(Self {
            points: points.into(),
        })
    }

    /// Parse a points document from a JSON string
    pub fn from_json(s: &str) -> Result<Self, WanderersError> {
        let doc: PointsDocument =
            serde_json::from_str(s).map_err(|e| PointsError::Parse(e.to_string()))?;
        Self::new(doc.points)
    }

    /// Read and parse a points document
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, WanderersError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PointsError::Read(format!("{}: {}", path.display(), e)))?;

        let store = Self::from_json(&contents)?;
        tracing::info!("Loaded {} map points from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn points(&self) -> &[MapPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<MapPoint> {
        self.points.get(index).copied()
    }

    /// The document form served back to the page
    pub fn to_document(&self) -> PointsDocument {
        PointsDocument {
            points: self.points.to_vec(),
        }
    }
}
