//! Per-avatar motion state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::map::geometry::{lerp, rescale};

/// Where an avatar is in its move cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "phase")]
pub enum MotionPhase {
    /// Resting at a destination until `next_move_at`
    Idle { next_move_at: Duration },
    /// Interpolating toward the target
    Moving,
}

impl Default for MotionPhase {
    fn default() -> Self {
        Self::Idle {
            next_move_at: Duration::ZERO,
        }
    }
}

impl std::fmt::Display for MotionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotionPhase::Idle { .. } => write!(f, "idle"),
            MotionPhase::Moving => write!(f, "moving"),
        }
    }
}

/// Motion record for one avatar. Positions are in map pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarState {
    index: usize,
    /// Position committed when the current segment began
    start: Vec2,
    position: Vec2,
    target: Vec2,
    /// Fraction of the current segment completed, always in [0, 1]
    progress: f32,
    /// Progress added per frame
    speed: f32,
    phase: MotionPhase,
}

impl AvatarState {
    /// Create an avatar resting at `position`, due to move at `next_move_at`
    pub fn new(index: usize, position: Vec2, speed: f32, next_move_at: Duration) -> Self {
        Self {
            index,
            start: position,
            position,
            target: position,
            progress: 1.0,
            speed,
            phase: MotionPhase::Idle { next_move_at },
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.phase, MotionPhase::Moving)
    }

    /// Scheduled start of the next segment, if resting
    pub fn next_move_at(&self) -> Option<Duration> {
        match self.phase {
            MotionPhase::Idle { next_move_at } => Some(next_move_at),
            MotionPhase::Moving => None,
        }
    }

    /// Whether a resting avatar should start moving at `now`
    pub fn is_due(&self, now: Duration) -> bool {
        matches!(self.phase, MotionPhase::Idle { next_move_at } if now >= next_move_at)
    }

    /// Choose the next destination and when to head for it
    pub fn retarget(&mut self, target: Vec2, next_move_at: Duration) {
        self.target = target;
        self.phase = MotionPhase::Idle { next_move_at };
    }

    /// Idle -> Moving: commit the current position as the segment start
    pub fn begin_move(&mut self) {
        self.start = self.position;
        self.progress = 0.0;
        self.phase = MotionPhase::Moving;
    }

    /// Advance one frame. Returns true on the frame the target is reached.
    pub fn advance(&mut self) -> bool {
        if !self.is_moving() {
            return false;
        }

        self.progress = (self.progress + self.speed).clamp(0.0, 1.0);
        self.position = lerp(self.start, self.target, self.progress);

        self.progress >= 1.0
    }

    /// Rescale all pixel positions from `previous` to `current` map size
    pub fn rescale(&mut self, previous: Vec2, current: Vec2) {
        let scale = |p: Vec2| {
            Vec2::new(
                rescale(p.x, previous.x, current.x),
                rescale(p.y, previous.y, current.y),
            )
        };

        self.start = scale(self.start);
        self.position = scale(self.position);
        self.target = scale(self.target);
    }
}
