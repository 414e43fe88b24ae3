//! Popup controller
//!
//! At most one informational popup is live at a time. Opening a popup arms a
//! single outside-click listener bound to it; the listener is dropped as soon
//! as it fires or the popup goes away by any other route.

use glam::Vec2;

use crate::avatar::AvatarState;
use crate::config::PopupConfig;
use crate::map::Rect;

/// A live popup anchored to the avatar that opened it
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    id: u64,
    avatar: usize,
    anchor: Vec2,
    text: String,
}

impl Popup {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Index of the avatar that opened this popup
    pub fn avatar(&self) -> usize {
        self.avatar
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Outside-click listener armed for one popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutsideClickListener {
    popup_id: u64,
}

/// Owns the single popup and its dismissal listener
#[derive(Debug)]
pub struct PopupController {
    config: PopupConfig,
    avatar_size: f32,
    current: Option<Popup>,
    listener: Option<OutsideClickListener>,
    next_id: u64,
}

impl PopupController {
    pub fn new(config: &PopupConfig, avatar_size: f32) -> Self {
        Self {
            config: config.clone(),
            avatar_size,
            current: None,
            listener: None,
            next_id: 1,
        }
    }

    pub fn current(&self) -> Option<&Popup> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Whether an outside-click listener is still armed
    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Hit box of an avatar icon
    pub fn avatar_bounds(&self, avatar: &AvatarState) -> Rect {
        Rect::centered(avatar.position(), self.avatar_size)
    }

    /// Hit box of a popup, placed above its anchor avatar
    pub fn bounds(&self, popup: &Popup) -> Rect {
        Rect::above(
            popup.anchor,
            Vec2::new(self.config.width, self.config.height),
            self.avatar_size / 2.0 + self.config.offset,
        )
    }

    /// Replace any open popup with a new one for `avatar`
    pub fn activate(&mut self, avatar: &AvatarState) -> &Popup {
        if let Some(old) = self.close() {
            tracing::debug!("Replacing popup {} for avatar {}", old.id, old.avatar);
        }

        let id = self.next_id;
        self.next_id += 1;

        let popup = Popup {
            id,
            avatar: avatar.index(),
            anchor: avatar.position(),
            text: self.config.text.replace("{n}", &(avatar.index() + 1).to_string()),
        };

        tracing::info!("Opened popup {} for avatar {}", id, avatar.index());
        self.listener = Some(OutsideClickListener { popup_id: id });
        self.current.insert(popup)
    }

    /// Explicitly close the popup. Also drops its listener.
    pub fn close(&mut self) -> Option<Popup> {
        self.listener = None;
        let popup = self.current.take()?;
        tracing::debug!("Closed popup {}", popup.id);
        Some(popup)
    }

    /// Feed a click to the outside-click listener.
    ///
    /// `origin` is the avatar that opened the popup, if it still exists.
    /// Returns true if the click dismissed the popup.
    pub fn handle_outside_click(&mut self, point: Vec2, origin: Option<&AvatarState>) -> bool {
        let (Some(listener), Some(popup)) = (self.listener, self.current.as_ref()) else {
            return false;
        };

        if listener.popup_id != popup.id {
            self.listener = None;
            return false;
        }

        let inside_popup = self.bounds(popup).contains(point);
        let inside_origin = origin
            .filter(|a| a.index() == popup.avatar)
            .is_some_and(|a| self.avatar_bounds(a).contains(point));

        if inside_popup || inside_origin {
            return false;
        }

        self.close().is_some()
    }

    /// Snap the popup to its avatar's current position.
    ///
    /// Runs every frame and after a resize. An idle avatar keeps its
    /// position, so syncing it is a no-op except on the arrival frame.
    pub fn sync(&mut self, avatars: &[AvatarState]) {
        let Some(popup) = self.current.as_mut() else {
            return;
        };

        if let Some(avatar) = avatars.get(popup.avatar) {
            popup.anchor = avatar.position();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn avatar(index: usize, x: f32, y: f32) -> AvatarState {
        AvatarState::new(index, Vec2::new(x, y), 0.5, Duration::ZERO)
    }

    fn controller() -> PopupController {
        PopupController::new(&PopupConfig::default(), 40.0)
    }

    #[test]
    fn test_single_popup() {
        let mut popups = controller();
        let a = avatar(0, 100.0, 300.0);
        let b = avatar(1, 500.0, 300.0);

        let first = popups.activate(&a).id();
        assert_eq!(popups.current().unwrap().avatar(), 0);

        let second = popups.activate(&b).id();
        assert_ne!(first, second);
        assert_eq!(popups.current().unwrap().avatar(), 1);
        assert_eq!(popups.current().unwrap().anchor(), Vec2::new(500.0, 300.0));
        assert!(popups.has_listener());
    }

    #[test]
    fn test_text_template() {
        let mut popups = controller();
        let popup = popups.activate(&avatar(2, 0.0, 0.0));
        assert_eq!(popup.text(), "Avatar 3 is exploring the map.");
    }

    #[test]
    fn test_outside_click_closes_once() {
        let mut popups = controller();
        let a = avatar(0, 400.0, 400.0);
        popups.activate(&a);

        assert!(popups.handle_outside_click(Vec2::new(10.0, 10.0), Some(&a)));
        assert!(!popups.is_open());
        assert!(!popups.has_listener());

        // Listener is gone, further clicks do nothing
        assert!(!popups.handle_outside_click(Vec2::new(10.0, 10.0), Some(&a)));
    }

    #[test]
    fn test_click_inside_keeps_popup() {
        let mut popups = controller();
        let a = avatar(0, 400.0, 400.0);
        popups.activate(&a);

        // On the avatar itself
        assert!(!popups.handle_outside_click(Vec2::new(405.0, 395.0), Some(&a)));
        // Inside the popup box, which sits above the avatar
        assert!(!popups.handle_outside_click(Vec2::new(400.0, 340.0), Some(&a)));
        assert!(popups.is_open());
        assert!(popups.has_listener());
    }

    #[test]
    fn test_explicit_close_drops_listener() {
        let mut popups = controller();
        popups.activate(&avatar(0, 10.0, 10.0));
        assert!(popups.close().is_some());
        assert!(!popups.has_listener());
        assert!(popups.close().is_none());
    }

    #[test]
    fn test_sync_follows_moving_avatar() {
        let mut popups = controller();
        let mut a = avatar(0, 0.0, 0.0);
        popups.activate(&a);

        a.retarget(Vec2::new(100.0, 0.0), Duration::ZERO);
        a.begin_move();
        a.advance();
        popups.sync(std::slice::from_ref(&a));
        assert_eq!(popups.current().unwrap().anchor(), Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_sync_on_arrival_frame() {
        let mut popups = controller();
        let mut a = avatar(0, 0.0, 0.0);
        popups.activate(&a);

        a.retarget(Vec2::new(100.0, 0.0), Duration::ZERO);
        a.begin_move();
        a.advance();
        popups.sync(std::slice::from_ref(&a));

        // Arrives and immediately goes idle with a new target
        assert!(a.advance());
        a.retarget(Vec2::new(0.0, 100.0), Duration::from_secs(10));
        assert!(!a.is_moving());

        popups.sync(std::slice::from_ref(&a));
        assert_eq!(popups.current().unwrap().anchor(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_sync_ignores_missing_avatar() {
        let mut popups = controller();
        let a = avatar(3, 20.0, 20.0);
        popups.activate(&a);

        popups.sync(&[]);
        assert_eq!(popups.current().unwrap().anchor(), Vec2::new(20.0, 20.0));

        let others = [avatar(0, 1.0, 1.0), avatar(1, 2.0, 2.0)];
        popups.sync(&others);
        assert_eq!(popups.current().unwrap().anchor(), Vec2::new(20.0, 20.0));
    }
}
