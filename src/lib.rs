//! Wanderers - avatar icons wandering a map
//!
//! A headless service that:
//! - Loads a set of normalized map points once at startup
//! - Walks a handful of avatars between random points, one frame at a time
//! - Shows an informational popup for a clicked avatar
//! - Streams rendered frames to a browser page over Server-Sent Events

pub mod avatar;
pub mod config;
pub mod error;
pub mod map;
pub mod output;
pub mod popup;
pub mod scene;
pub mod web;

pub use config::Config;
pub use error::{Result, WanderersError};

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, RwLock};

use avatar::AvatarAssets;
use error::SceneError;
use map::PointsDocument;
use scene::{Command, Frame};

/// Application state shared across all components
#[derive(Debug)]
pub struct AppState {
    /// Current configuration
    pub config: RwLock<Config>,
    /// Most recently rendered frame
    frame: RwLock<Frame>,
    /// Channel for rendered frames
    frame_tx: broadcast::Sender<Frame>,
    /// Requests into the frame loop
    commands: mpsc::Sender<Command>,
    /// Points document once loaded
    points: RwLock<Option<PointsDocument>>,
    /// Avatar image lookup
    pub assets: AvatarAssets,
    /// Shutdown signal
    shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Create the shared state and the receiving end of the command channel
    pub fn new(config: Config) -> (Arc<Self>, mpsc::Receiver<Command>) {
        let (frame_tx, _) = broadcast::channel(64);
        let (shutdown_tx, _) = broadcast::channel(1);
        let (commands, commands_rx) = mpsc::channel(64);

        let state = Arc::new(Self {
            assets: AvatarAssets::new(&config.avatars),
            config: RwLock::new(config),
            frame: RwLock::new(Frame::default()),
            frame_tx,
            commands,
            points: RwLock::new(None),
            shutdown_tx,
        });

        (state, commands_rx)
    }

    /// Store a rendered frame and broadcast it
    pub async fn publish_frame(&self, frame: Frame) {
        let mut current = self.frame.write().await;
        *current = frame.clone();
        let _ = self.frame_tx.send(frame);
    }

    /// Get the latest frame
    pub async fn current_frame(&self) -> Frame {
        self.frame.read().await.clone()
    }

    /// Subscribe to rendered frames
    pub fn subscribe_frames(&self) -> broadcast::Receiver<Frame> {
        self.frame_tx.subscribe()
    }

    /// Remember the loaded points so the page can fetch them
    pub async fn set_points(&self, points: PointsDocument) {
        *self.points.write().await = Some(points);
    }

    /// Loaded points document, if any
    pub async fn points(&self) -> Option<PointsDocument> {
        self.points.read().await.clone()
    }

    /// Queue a command without waiting for a reply
    pub async fn send(&self, command: Command) -> std::result::Result<(), SceneError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SceneError::LoopStopped)
    }

    /// Send a command built around a reply channel and wait for the answer
    pub async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> std::result::Result<T, SceneError> {
        let (reply, rx) = oneshot::channel();
        self.send(command(reply)).await?;
        rx.await.map_err(|_| SceneError::LoopStopped)
    }

    /// Subscribe to shutdown signal
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
