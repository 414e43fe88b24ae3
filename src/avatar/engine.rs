//! Avatar motion engine
//!
//! Owns every avatar record and advances them one frame at a time. Time is
//! passed in by the caller as the elapsed duration since the loop started, so
//! the engine itself never reads a clock.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

use crate::avatar::state::AvatarState;
use crate::config::{MotionConfig, MotionMode};
use crate::error::SceneError;
use crate::map::{MapPoint, PointStore};

/// Moves avatars between random map points
#[derive(Debug)]
pub struct MotionEngine {
    config: MotionConfig,
    points: Option<PointStore>,
    avatars: Vec<AvatarState>,
    map_size: Vec2,
    rng: ChaCha8Rng,
}

impl MotionEngine {
    pub fn new(config: &MotionConfig, map_size: Vec2) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            config: config.clone(),
            points: None,
            avatars: Vec::new(),
            map_size,
            rng,
        }
    }

    /// Install the loaded points. Does not create avatars by itself.
    pub fn set_points(&mut self, points: PointStore) {
        self.points = Some(points);
    }

    pub fn points(&self) -> Option<&PointStore> {
        self.points.as_ref()
    }

    pub fn avatars(&self) -> &[AvatarState] {
        &self.avatars
    }

    pub fn avatar(&self, index: usize) -> Option<&AvatarState> {
        self.avatars.get(index)
    }

    pub fn map_size(&self) -> Vec2 {
        self.map_size
    }

    pub fn mode(&self) -> MotionMode {
        self.config.mode
    }

    /// Destroy all avatars and create `count` new ones at random points.
    ///
    /// Returns the number of avatars created, which is zero until points
    /// have been loaded.
    pub fn initialize(&mut self, count: usize, now: Duration) -> usize {
        self.avatars.clear();

        let Some(points) = self.points.as_ref() else {
            tracing::debug!("No map points loaded, skipping avatar initialization");
            return 0;
        };

        for index in 0..count {
            let start = pick_point(&mut self.rng, points).to_pixels(self.map_size);
            let speed = self
                .rng
                .gen_range(self.config.min_speed..=self.config.max_speed);

            let mut avatar = AvatarState::new(index, start, speed, now);
            let target = pick_point(&mut self.rng, points).to_pixels(self.map_size);
            let next_move_at = now + next_delay(&mut self.rng, &self.config);
            avatar.retarget(target, next_move_at);

            tracing::debug!(
                "Avatar {} placed at ({:.1}, {:.1}), speed {:.3}",
                index,
                start.x,
                start.y,
                speed
            );
            self.avatars.push(avatar);
        }

        tracing::info!("Initialized {} avatars", self.avatars.len());
        self.avatars.len()
    }

    /// Advance every avatar by one frame
    pub fn tick(&mut self, now: Duration) {
        let Some(points) = self.points.as_ref() else {
            return;
        };

        for avatar in &mut self.avatars {
            if avatar.is_due(now) {
                avatar.begin_move();
            }

            if avatar.advance() {
                let target = pick_point(&mut self.rng, points).to_pixels(self.map_size);
                let next_move_at = now + next_delay(&mut self.rng, &self.config);
                avatar.retarget(target, next_move_at);
            }
        }
    }

    /// Rescale every avatar to a new map size
    pub fn resize(&mut self, size: Vec2) -> Result<(), SceneError> {
        if !(size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(SceneError::InvalidMapSize {
                width: size.x,
                height: size.y,
            });
        }

        let previous = self.map_size;
        for avatar in &mut self.avatars {
            avatar.rescale(previous, size);
        }
        self.map_size = size;

        tracing::debug!(
            "Map resized from {}x{} to {}x{}",
            previous.x,
            previous.y,
            size.x,
            size.y
        );
        Ok(())
    }
}

fn pick_point(rng: &mut ChaCha8Rng, points: &PointStore) -> MapPoint {
    points.points()[rng.gen_range(0..points.len())]
}

fn next_delay(rng: &mut ChaCha8Rng, config: &MotionConfig) -> Duration {
    match config.mode {
        MotionMode::Continuous => Duration::ZERO,
        MotionMode::Scheduled => {
            Duration::from_millis(rng.gen_range(config.min_delay_ms..=config.max_delay_ms))
        }
    }
}
