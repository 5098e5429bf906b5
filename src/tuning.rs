//! Data-driven game balance
//!
//! Every constant the simulation reads lives in [`Tuning`]. Defaults come from
//! [`crate::consts`]; a JSON file may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors produced while loading or validating tuning
#[derive(Debug, Error)]
pub enum TuningError {
    /// File could not be read
    #[error("failed to read tuning: {0}")]
    Io(#[from] std::io::Error),
    /// JSON was malformed or had the wrong shape
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    /// Values were well-formed but inconsistent
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Game balance and layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play area ===
    pub area_width: f32,
    pub area_height: f32,

    // === Player ===
    pub player_size: f32,
    /// Default player y is `area_height - player_start_offset`
    pub player_start_offset: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,

    // === Obstacles ===
    pub min_obstacle_size: f32,
    pub max_obstacle_size: f32,
    /// Seconds between spawns
    pub spawn_interval: f64,

    // === Difficulty ===
    /// Fall speed at session start (units/s)
    pub initial_speed: f32,
    /// Speed gained per second of play (units/s²)
    pub accel_rate: f32,
    /// Seconds between motion ticks
    pub motion_interval: f64,

    // === Score ===
    pub score_per_second: u32,
    pub score_ticks_per_second: u32,

    // === Revive ===
    /// Obstacles are pushed to at most `player.y - safe_margin`
    pub safe_margin: f32,
    /// Seconds of invincibility after a revive
    pub invincibility_duration: f64,

    // === Scheduling ===
    /// Max firings per timer in one pump before the backlog is dropped
    pub max_catch_up: u32,

    // === Monetization ===
    /// Show an interstitial every N games started
    pub interstitial_every: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            area_width: AREA_WIDTH,
            area_height: AREA_HEIGHT,

            player_size: PLAYER_SIZE,
            player_start_offset: PLAYER_START_OFFSET,
            top_margin: TOP_MARGIN,
            bottom_margin: BOTTOM_MARGIN,

            min_obstacle_size: MIN_OBSTACLE_SIZE,
            max_obstacle_size: MAX_OBSTACLE_SIZE,
            spawn_interval: SPAWN_INTERVAL,

            initial_speed: INITIAL_SPEED,
            accel_rate: ACCEL_RATE,
            motion_interval: MOTION_INTERVAL,

            score_per_second: SCORE_PER_SECOND,
            score_ticks_per_second: SCORE_TICKS_PER_SECOND,

            safe_margin: SAFE_MARGIN,
            invincibility_duration: INVINCIBILITY_DURATION,

            max_catch_up: MAX_CATCH_UP,

            interstitial_every: INTERSTITIAL_EVERY,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load tuning from a file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({e})");
                Self::default()
            }
        }
    }

    /// Check that the values describe a playable game
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: &str| Err(TuningError::Invalid(msg.to_string()));

        if !(self.area_width > 0.0 && self.area_height > 0.0) {
            return invalid("play area must have positive extents");
        }
        if !(self.min_obstacle_size > 0.0 && self.min_obstacle_size <= self.max_obstacle_size) {
            return invalid("obstacle size range must be positive and ordered");
        }
        if self.max_obstacle_size > self.area_width {
            return invalid("obstacles must fit the play area width");
        }
        if self.player_size <= 0.0 || self.player_size > self.area_width {
            return invalid("player must fit the play area width");
        }
        if self.top_margin > self.area_height - self.player_size - self.bottom_margin {
            return invalid("vertical margins leave no room for the player");
        }
        if !(self.spawn_interval > 0.0 && self.motion_interval > 0.0) {
            return invalid("timer intervals must be positive");
        }
        if self.score_ticks_per_second == 0 {
            return invalid("score cadence must be positive");
        }
        if self.accel_rate < 0.0 {
            return invalid("speed must never decrease");
        }
        if self.invincibility_duration < 0.0 {
            return invalid("invincibility duration cannot be negative");
        }
        if self.max_catch_up == 0 {
            return invalid("max_catch_up must allow at least one firing");
        }
        Ok(())
    }

    /// Seconds between score ticks
    pub fn score_interval(&self) -> f64 {
        1.0 / self.score_ticks_per_second as f64
    }

    /// Points added per score tick (integer division, floored)
    pub fn score_per_tick(&self) -> u64 {
        (self.score_per_second / self.score_ticks_per_second) as u64
    }

    /// Player's top-left corner at session start
    pub fn player_start(&self) -> (f32, f32) {
        (
            self.area_width / 2.0 - self.player_size / 2.0,
            self.area_height - self.player_start_offset,
        )
    }

    /// Allowed range for the player's top-left x
    pub fn player_x_range(&self) -> (f32, f32) {
        (0.0, self.area_width - self.player_size)
    }

    /// Allowed range for the player's top-left y
    pub fn player_y_range(&self) -> (f32, f32) {
        (
            self.top_margin,
            self.area_height - self.player_size - self.bottom_margin,
        )
    }
}
