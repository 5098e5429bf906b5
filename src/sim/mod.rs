//! Simulation core
//!
//! Pure gameplay logic with no platform dependencies:
//! - Handlers take a state snapshot and return a replacement
//! - Randomness only through the caller's seeded RNG
//! - Obstacles keep spawn order

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_collision, rects_overlap};
pub use state::{LifePhase, Obstacle, ObstacleId, Player, SimulationState};
pub use tick::{
    TickOutcome, accrue_score, advance_obstacles, apply_revive, expire_invincibility,
    move_player, spawn_obstacle,
};
