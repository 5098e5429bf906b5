//! Simulation state and core types
//!
//! [`SimulationState`] is the single source of truth for a play session.
//! Handlers in [`super::tick`] read it as a snapshot and return a complete
//! replacement; nothing mutates it piecemeal from the outside.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::Tuning;

/// Opaque, session-unique obstacle identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u64);

/// A falling square hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Simulation speed when this obstacle spawned (informational only;
    /// motion always uses the live speed)
    pub spawn_speed: f32,
}

impl Obstacle {
    pub fn new(id: ObstacleId, pos: Vec2, side: f32, spawn_speed: f32) -> Self {
        Self {
            id,
            pos,
            size: Vec2::splat(side),
            spawn_speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// True once the obstacle has fallen past the bottom edge by its own height
    #[inline]
    pub fn has_exited(&self, area_height: f32) -> bool {
        self.pos.y > area_height + self.size.y
    }
}

/// The player's avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Collisions are ignored while set
    pub invincible: bool,
}

impl Player {
    pub fn new(pos: Vec2, side: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(side),
            invincible: false,
        }
    }

    /// Player at the default center-bottom start position
    pub fn at_start(tuning: &Tuning) -> Self {
        let (x, y) = tuning.player_start();
        Self::new(Vec2::new(x, y), tuning.player_size)
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Blink helper for presentation: alternates every 200ms while the
    /// invincibility deadline has not passed.
    pub fn blink_visible(now: f64, invincible_until: Option<f64>) -> bool {
        match invincible_until {
            Some(until) if now < until => {
                let remaining_ms = ((until - now) * 1000.0) as u64;
                (remaining_ms / 200) % 2 == 0
            }
            _ => true,
        }
    }
}

/// Where the session sits in the death/revive state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifePhase {
    /// Playing normally (or not yet started)
    Alive,
    /// Collided with an extra life left; waiting on the reward interaction
    ReviveAvailable,
    /// Revived and invincible until the expiry timer fires
    Reviving,
    /// Terminal for this session
    Dead,
}

/// Complete simulation state for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub running: bool,
    pub paused: bool,
    pub score: u64,
    /// Obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub player: Player,
    /// Live fall speed (units/s)
    pub speed: f32,
    pub has_extra_life: bool,
    pub life: LifePhase,
    /// Next obstacle ID
    pub(crate) next_id: u64,
}

impl SimulationState {
    /// Idle state before the first session starts
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            running: false,
            paused: false,
            score: 0,
            obstacles: Vec::new(),
            player: Player::at_start(tuning),
            speed: tuning.initial_speed,
            has_extra_life: true,
            life: LifePhase::Alive,
            next_id: 1,
        }
    }

    /// Idle state for the next session.
    ///
    /// IDs keep counting across sessions so they stay unique for the
    /// lifetime of the owner.
    pub fn reset(&self, tuning: &Tuning) -> Self {
        Self {
            next_id: self.next_id,
            ..Self::new(tuning)
        }
    }

    /// Fresh running state for a new session
    pub fn new_session(&self, tuning: &Tuning) -> Self {
        Self {
            running: true,
            ..self.reset(tuning)
        }
    }

    /// True when periodic tasks are allowed to mutate the state
    #[inline]
    pub fn is_active(&self) -> bool {
        self.running && !self.paused
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        id
    }
}
