//! Scene: the single owner of all avatar and popup state
//!
//! The frame loop holds the only `Scene`. Everything that mutates avatars or
//! the popup goes through the methods here.

pub mod frame;
pub mod runner;

pub use frame::{render, AvatarView, Frame, MapSize, PopupView};
pub use runner::{Command, FrameLoop};

use glam::Vec2;
use serde::Serialize;
use std::time::Duration;

use crate::avatar::MotionEngine;
use crate::config::{Config, MAX_AVATARS};
use crate::error::SceneError;
use crate::map::PointStore;
use crate::popup::PopupController;

/// What a click on the map ended up hitting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "target")]
pub enum ClickOutcome {
    /// An avatar was hit and its popup opened
    Avatar { index: usize },
    /// The click landed inside the open popup
    Popup,
    /// Map background; `dismissed` is true if it closed the popup
    Map { x: f32, y: f32, dismissed: bool },
}

/// Avatars, popup and frame counter
#[derive(Debug)]
pub struct Scene {
    engine: MotionEngine,
    popups: PopupController,
    avatar_count: usize,
    seq: u64,
}

impl Scene {
    pub fn new(config: &Config) -> Self {
        let map_size = Vec2::new(config.map.width, config.map.height);

        Self {
            engine: MotionEngine::new(&config.motion, map_size),
            popups: PopupController::new(&config.popup, config.avatars.size),
            avatar_count: config.avatars.count,
            seq: 0,
        }
    }

    pub fn engine(&self) -> &MotionEngine {
        &self.engine
    }

    pub fn popups(&self) -> &PopupController {
        &self.popups
    }

    /// Frames rendered so far
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Install loaded points and place the avatars
    pub fn load_points(&mut self, points: PointStore, now: Duration) -> usize {
        self.engine.set_points(points);
        self.engine.initialize(self.avatar_count, now)
    }

    /// Recreate the avatars with a new count. Closes any popup.
    pub fn reinitialize(&mut self, count: usize, now: Duration) -> Result<usize, SceneError> {
        if count > MAX_AVATARS {
            return Err(SceneError::InvalidAvatarCount {
                count,
                max: MAX_AVATARS,
            });
        }

        self.popups.close();
        self.avatar_count = count;
        Ok(self.engine.initialize(count, now))
    }

    /// Advance one frame and render it
    pub fn tick(&mut self, now: Duration) -> Frame {
        self.engine.tick(now);
        self.popups.sync(self.engine.avatars());
        self.seq += 1;
        render(self)
    }

    /// Open the popup for an avatar
    pub fn activate(&mut self, index: usize) -> Result<PopupView, SceneError> {
        let avatar = self
            .engine
            .avatar(index)
            .ok_or(SceneError::UnknownAvatar(index))?;

        self.popups.activate(avatar);
        frame::popup_view(&self.popups).ok_or(SceneError::UnknownAvatar(index))
    }

    /// Close the popup. Returns false if none was open.
    pub fn close_popup(&mut self) -> bool {
        self.popups.close().is_some()
    }

    /// Topmost avatar under `point`. Later avatars are drawn on top.
    pub fn avatar_at(&self, point: Vec2) -> Option<usize> {
        self.engine
            .avatars()
            .iter()
            .rev()
            .find(|a| self.popups.avatar_bounds(a).contains(point))
            .map(|a| a.index())
    }

    /// Route a click at map pixel coordinates.
    ///
    /// The popup is drawn above every avatar, so it is hit-tested first.
    pub fn click(&mut self, point: Vec2) -> ClickOutcome {
        if let Some(popup) = self.popups.current() {
            if self.popups.bounds(popup).contains(point) {
                return ClickOutcome::Popup;
            }
        }

        let hit = self
            .engine
            .avatars()
            .iter()
            .rev()
            .find(|a| self.popups.avatar_bounds(a).contains(point));
        if let Some(avatar) = hit {
            let index = avatar.index();
            self.popups.activate(avatar);
            return ClickOutcome::Avatar { index };
        }

        tracing::debug!("{{ x: {}, y: {} }},", point.x, point.y);

        let origin = self
            .popups
            .current()
            .and_then(|p| self.engine.avatar(p.avatar()))
            .cloned();
        let dismissed = self.popups.handle_outside_click(point, origin.as_ref());

        ClickOutcome::Map {
            x: point.x,
            y: point.y,
            dismissed,
        }
    }

    /// The page reported new map dimensions
    pub fn resize(&mut self, size: Vec2) -> Result<(), SceneError> {
        self.engine.resize(size)?;
        self.popups.sync(self.engine.avatars());
        Ok(())
    }
}
