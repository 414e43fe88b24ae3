//! The frame loop
//!
//! One task owns the `Scene`. It ticks at the configured frame rate and
//! applies commands sent by HTTP handlers between ticks, so every mutation
//! happens on this task.

use glam::Vec2;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::SceneError;
use crate::map::PointStore;
use crate::scene::{render, ClickOutcome, PopupView, Scene};
use crate::AppState;

/// Requests into the frame loop
#[derive(Debug)]
pub enum Command {
    /// Points finished loading; place the avatars
    LoadPoints(PointStore),
    /// Open the popup for an avatar
    Activate {
        index: usize,
        reply: oneshot::Sender<Result<PopupView, SceneError>>,
    },
    /// Close the popup
    ClosePopup { reply: oneshot::Sender<bool> },
    /// A click on the map, in map pixels
    Click {
        point: Vec2,
        reply: oneshot::Sender<ClickOutcome>,
    },
    /// The page's map element changed size
    Resize {
        size: Vec2,
        reply: oneshot::Sender<Result<(), SceneError>>,
    },
    /// Recreate avatars with a new count
    SetAvatarCount {
        count: usize,
        reply: oneshot::Sender<Result<usize, SceneError>>,
    },
}

/// Drives the scene at a fixed frame rate
pub struct FrameLoop {
    scene: Scene,
    commands: mpsc::Receiver<Command>,
    period: Duration,
}

impl FrameLoop {
    pub fn new(config: &Config, commands: mpsc::Receiver<Command>) -> Self {
        Self {
            scene: Scene::new(config),
            commands,
            period: Duration::from_secs_f64(1.0 / f64::from(config.motion.fps.max(1))),
        }
    }

    /// Run until shutdown
    pub async fn run(mut self, state: Arc<AppState>) {
        let started = Instant::now();
        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut shutdown_rx = state.subscribe_shutdown();

        info!("Frame loop started ({:?} per frame)", self.period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let frame = self.scene.tick(started.elapsed());
                    state.publish_frame(frame).await;
                }
                Some(command) = self.commands.recv() => {
                    self.apply(command, started.elapsed());
                    state.publish_frame(render(&self.scene)).await;
                }
                _ = shutdown_rx.recv() => {
                    info!("Frame loop shutting down");
                    break;
                }
            }
        }
    }

    /// Apply one command to the scene
    pub fn apply(&mut self, command: Command, now: Duration) {
        match command {
            Command::LoadPoints(points) => {
                let placed = self.scene.load_points(points, now);
                info!("Placed {} avatars", placed);
            }
            Command::Activate { index, reply } => {
                let _ = reply.send(self.scene.activate(index));
            }
            Command::ClosePopup { reply } => {
                let _ = reply.send(self.scene.close_popup());
            }
            Command::Click { point, reply } => {
                let outcome = self.scene.click(point);
                debug!("Click at ({}, {}): {:?}", point.x, point.y, outcome);
                let _ = reply.send(outcome);
            }
            Command::Resize { size, reply } => {
                let _ = reply.send(self.scene.resize(size));
            }
            Command::SetAvatarCount { count, reply } => {
                let _ = reply.send(self.scene.reinitialize(count, now));
            }
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}
