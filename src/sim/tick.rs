//! Per-tick simulation handlers
//!
//! Each handler reads a consistent snapshot of [`SimulationState`] and
//! returns a complete replacement. The session swaps the result in
//! wholesale, so no handler ever observes another one half-applied.

use glam::Vec2;
use rand::Rng;

use super::collision::first_collision;
use super::state::{LifePhase, Obstacle, ObstacleId, SimulationState};
use crate::tuning::Tuning;

/// Result of one motion tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Session not running (or paused); nothing happened
    Idle,
    /// Obstacles moved and speed ramped; commit this state
    Advanced(SimulationState),
    /// The player was hit. The tick is discarded: the caller keeps the
    /// pre-tick state and runs the collision handler.
    Collided { obstacle: ObstacleId },
}

/// Spawn one obstacle above the visible area.
///
/// Returns `None` while stopped or paused.
pub fn spawn_obstacle<R: Rng + ?Sized>(
    state: &SimulationState,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<SimulationState> {
    if !state.is_active() {
        return None;
    }

    let size = rng.random_range(tuning.min_obstacle_size..=tuning.max_obstacle_size);
    let max_x = (tuning.area_width - size).max(0.0);
    let x = rng.random_range(0.0..=max_x);

    let mut next = state.clone();
    let id = next.next_obstacle_id();
    next.obstacles.push(Obstacle::new(id, Vec2::new(x, -size), size, state.speed));

    log::debug!("Spawned obstacle {:?} size={size:.1} x={x:.1}", id);
    Some(next)
}

/// Advance every obstacle by `dt` seconds at the ramped speed.
///
/// Obstacles that fall past the bottom edge by their own height are dropped.
/// The first surviving obstacle that overlaps a vulnerable player aborts the
/// tick entirely.
pub fn advance_obstacles(state: &SimulationState, dt: f32, tuning: &Tuning) -> TickOutcome {
    if !state.is_active() {
        return TickOutcome::Idle;
    }

    // Clock skew must never slow the game down
    let dt = dt.max(0.0);
    let speed = state.speed + tuning.accel_rate * dt;

    let moved: Vec<Obstacle> = state
        .obstacles
        .iter()
        .map(|o| Obstacle {
            pos: Vec2::new(o.pos.x, o.pos.y + speed * dt),
            ..o.clone()
        })
        .filter(|o| !o.has_exited(tuning.area_height))
        .collect();

    if let Some(obstacle) = first_collision(&state.player, &moved) {
        return TickOutcome::Collided { obstacle };
    }

    TickOutcome::Advanced(SimulationState {
        obstacles: moved,
        speed,
        ..state.clone()
    })
}

/// Add one score tick's worth of points.
///
/// Returns `None` while stopped or paused.
pub fn accrue_score(state: &SimulationState, tuning: &Tuning) -> Option<SimulationState> {
    if !state.is_active() {
        return None;
    }
    Some(SimulationState {
        score: state.score + tuning.score_per_tick(),
        ..state.clone()
    })
}

/// Consume the extra life: clear space above the player, grant
/// invincibility and mark the session running again.
pub fn apply_revive(state: &SimulationState, tuning: &Tuning) -> SimulationState {
    let ceiling = state.player.pos.y - tuning.safe_margin;

    let mut next = state.clone();
    for obstacle in &mut next.obstacles {
        obstacle.pos.y = obstacle.pos.y.min(ceiling);
    }
    next.has_extra_life = false;
    next.player.invincible = true;
    next.life = LifePhase::Reviving;
    next.running = true;
    next.paused = false;
    next
}

/// End the invincibility window
pub fn expire_invincibility(state: &SimulationState) -> SimulationState {
    let mut next = state.clone();
    next.player.invincible = false;
    if next.life == LifePhase::Reviving {
        next.life = LifePhase::Alive;
    }
    next
}

/// Move the player by a drag delta, clamped to the playable rectangle.
///
/// Returns `None` while stopped or paused (input is ignored).
pub fn move_player(
    state: &SimulationState,
    delta: Vec2,
    tuning: &Tuning,
) -> Option<SimulationState> {
    if !state.is_active() {
        return None;
    }
    let (min_x, max_x) = tuning.player_x_range();
    let (min_y, max_y) = tuning.player_y_range();
    let target = state.player.pos + delta;

    let mut next = state.clone();
    next.player.pos = Vec2::new(target.x.clamp(min_x, max_x), target.y.clamp(min_y, max_y));
    Some(next)
}
