//! Error types for Wanderers

use thiserror::Error;

/// Main error type for Wanderers
#[derive(Error, Debug)]
pub enum WanderersError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Points error: {0}")]
    Points(#[from] PointsError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors loading the map points document
#[derive(Error, Debug)]
pub enum PointsError {
    #[error("Failed to read points file: {0}")]
    Read(String),

    #[error("Failed to parse points: {0}")]
    Parse(String),

    #[error("Points document contains no points")]
    Empty,

    #[error("Point {index} is outside the unit square: ({x}, {y})")]
    OutOfRange { index: usize, x: f32, y: f32 },
}

/// Errors raised by scene commands
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Unknown avatar: {0}")]
    UnknownAvatar(usize),

    #[error("Invalid avatar count {count}, at most {max} allowed")]
    InvalidAvatarCount { count: usize, max: usize },

    #[error("Invalid map size: {width}x{height}")]
    InvalidMapSize { width: f32, height: f32 },

    #[error("Avatar image not found: {0}")]
    AssetNotFound(String),

    #[error("Failed to read avatar image: {0}")]
    ImageLoad(String),

    #[error("Frame loop is not running")]
    LoopStopped,
}

/// Result type alias for Wanderers operations
pub type Result<T> = std::result::Result<T, WanderersError>;
