//! Configuration parsing and management for Wanderers

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, WanderersError};

/// Upper bound on the number of avatars on the map
pub const MAX_AVATARS: usize = 256;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub map: MapConfig,
    pub motion: MotionConfig,
    pub avatars: AvatarsConfig,
    pub popup: PopupConfig,
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WanderersError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, WanderersError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, WanderersError> {
        let paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("config/default.toml"),
            dirs_path().join("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), WanderersError> {
        if !(self.map.width > 0.0 && self.map.height > 0.0) {
            return Err(invalid("map.width", "Map dimensions must be greater than 0"));
        }

        let speeds = 0.0..=1.0;
        if self.motion.min_speed <= 0.0 || !speeds.contains(&self.motion.min_speed) {
            return Err(invalid("motion.min_speed", "Speed must be in (0, 1]"));
        }
        if !speeds.contains(&self.motion.max_speed) {
            return Err(invalid("motion.max_speed", "Speed must be in (0, 1]"));
        }
        if self.motion.min_speed > self.motion.max_speed {
            return Err(invalid(
                "motion.min_speed",
                "min_speed must not exceed max_speed",
            ));
        }

        if self.motion.min_delay_ms > self.motion.max_delay_ms {
            return Err(invalid(
                "motion.min_delay_ms",
                "min_delay_ms must not exceed max_delay_ms",
            ));
        }

        if self.motion.fps == 0 {
            return Err(invalid("motion.fps", "Frame rate must be greater than 0"));
        }

        if self.avatars.count > MAX_AVATARS {
            return Err(invalid("avatars.count", "Too many avatars"));
        }

        if self.avatars.size <= 0.0 {
            return Err(invalid("avatars.size", "Avatar size must be greater than 0"));
        }

        if self.popup.width <= 0.0 || self.popup.height <= 0.0 {
            return Err(invalid("popup.width", "Popup size must be greater than 0"));
        }

        if self.http.port == 0 {
            return Err(invalid("http.port", "Port must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> WanderersError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

/// Map image and points source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// JSON document with the normalized points avatars travel between
    pub points_path: PathBuf,
    /// Background image served at /map/image
    pub image_path: PathBuf,
    /// Map width in pixels until the page reports its real size
    pub width: f32,
    /// Map height in pixels until the page reports its real size
    pub height: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            points_path: PathBuf::from("public/points.json"),
            image_path: PathBuf::from("public/map.png"),
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// How avatars pause between segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionMode {
    /// Wait a random delay at every destination
    #[default]
    Scheduled,
    /// Start the next segment on the frame after arrival
    Continuous,
}

/// Avatar motion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub mode: MotionMode,
    /// Lower bound of the per-avatar progress step per frame
    pub min_speed: f32,
    /// Upper bound of the per-avatar progress step per frame
    pub max_speed: f32,
    /// Shortest pause at a destination (scheduled mode)
    pub min_delay_ms: u64,
    /// Longest pause at a destination (scheduled mode)
    pub max_delay_ms: u64,
    /// Frames per second of the animation loop
    pub fps: u32,
    /// RNG seed; random if unset
    pub seed: Option<u64>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            mode: MotionMode::Scheduled,
            min_speed: 0.02,
            max_speed: 0.04,
            min_delay_ms: 5_000,
            max_delay_ms: 15_000,
            fps: 60,
            seed: None,
        }
    }
}

/// Avatar icons
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarsConfig {
    /// Number of avatars on the map
    pub count: usize,
    /// Directory containing avatar_1.png, avatar_2.png, ...
    pub assets_dir: PathBuf,
    /// Icon edge length in pixels, used for hit-testing
    pub size: f32,
}

impl Default for AvatarsConfig {
    fn default() -> Self {
        Self {
            count: 5,
            assets_dir: PathBuf::from("public/avatars"),
            size: 40.0,
        }
    }
}

/// Informational popup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Popup body; `{n}` is replaced with the avatar number
    pub text: String,
    pub width: f32,
    pub height: f32,
    /// Gap between the avatar's top edge and the popup
    pub offset: f32,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            text: "Avatar {n} is exploring the map.".to_string(),
            width: 220.0,
            height: 80.0,
            offset: 8.0,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Enable HTTP server
    pub enabled: bool,
    /// HTTP server host
    pub host: String,
    /// HTTP server port
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_enabled: true,
        }
    }
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("wanderers");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/wanderers");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/wanderers");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("wanderers");
        }
    }

    PathBuf::from(".")
}
