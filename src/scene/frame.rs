//! Rendered frames sent to the page

use serde::Serialize;

use crate::avatar::{AvatarAssets, AvatarState};
use crate::map::Rect;
use crate::popup::{Popup, PopupController};
use crate::scene::Scene;

/// Map dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapSize {
    pub width: f32,
    pub height: f32,
}

/// One avatar as the page should draw it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvatarView {
    pub index: usize,
    /// DOM id, `avatar1` for index 0
    pub id: String,
    pub image: String,
    pub x: f32,
    pub y: f32,
    pub moving: bool,
    pub progress: f32,
}

impl From<&AvatarState> for AvatarView {
    fn from(avatar: &AvatarState) -> Self {
        let position = avatar.position();
        Self {
            index: avatar.index(),
            id: format!("avatar{}", avatar.index() + 1),
            image: AvatarAssets::url(avatar.index()),
            x: position.x,
            y: position.y,
            moving: avatar.is_moving(),
            progress: avatar.progress(),
        }
    }
}

/// The open popup as the page should draw it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupView {
    pub id: u64,
    pub avatar: usize,
    pub x: f32,
    pub y: f32,
    pub bounds: Rect,
    pub text: String,
}

impl PopupView {
    pub fn new(popup: &Popup, bounds: Rect) -> Self {
        let anchor = popup.anchor();
        Self {
            id: popup.id(),
            avatar: popup.avatar(),
            x: anchor.x,
            y: anchor.y,
            bounds,
            text: popup.text().to_string(),
        }
    }
}

/// Snapshot of the whole scene at one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub seq: u64,
    pub map: MapSize,
    pub avatars: Vec<AvatarView>,
    pub popup: Option<PopupView>,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            seq: 0,
            map: MapSize {
                width: 0.0,
                height: 0.0,
            },
            avatars: Vec::new(),
            popup: None,
        }
    }
}

pub(crate) fn popup_view(popups: &PopupController) -> Option<PopupView> {
    popups
        .current()
        .map(|popup| PopupView::new(popup, popups.bounds(popup)))
}

/// Render the scene. Pure function of its state.
pub fn render(scene: &Scene) -> Frame {
    let engine = scene.engine();
    let size = engine.map_size();

    Frame {
        seq: scene.seq(),
        map: MapSize {
            width: size.x,
            height: size.y,
        },
        avatars: engine.avatars().iter().map(AvatarView::from).collect(),
        popup: popup_view(scene.popups()),
    }
}
