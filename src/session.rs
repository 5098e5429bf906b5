//! Play session driver
//!
//! Owns the [`SimulationState`] and schedules the three periodic tasks
//! (motion, spawn, score) plus the invincibility deadline. Every task runs
//! through [`Session::advance`], reads the current state and replaces it
//! wholesale with the handler's result.
//!
//! Revive flow:
//! ```text
//! Alive --hit, extra life--> ReviveAvailable --reward granted--> Reviving --expiry--> Alive
//!   |                              |
//!   +--hit, no extra life--+       +--declined / rejected--+
//!                          v                               v
//!                         Dead <---------------------------+
//! ```

use std::sync::mpsc::{Receiver, Sender, channel};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::platform::AdProvider;
use crate::sim::{
    LifePhase, ObstacleId, SimulationState, TickOutcome, accrue_score, advance_obstacles,
    apply_revive, expire_invincibility, move_player, spawn_obstacle,
};
use crate::timer::{Deadline, IntervalTimer};
use crate::tuning::Tuning;

/// Notifications for the host
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started,
    Paused,
    Resumed,
    Spawned { id: ObstacleId },
    /// Player hit an obstacle; the session is stopped
    Collision {
        obstacle: ObstacleId,
        score: u64,
        revive_available: bool,
    },
    /// Reward request accepted, waiting for the grant
    ReviveRequested,
    /// Reward request rejected by the provider
    ReviveUnavailable,
    Revived { invincible_until: f64 },
    InvincibilityExpired,
    /// Session reached its terminal state; emitted once per session
    SessionEnded { score: u64 },
    Stopped,
}

/// Why a revive request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReviveError {
    /// Not waiting on a revive decision
    #[error("no revive available")]
    NotAvailable,
    /// A reward request is already outstanding
    #[error("revive already requested")]
    AlreadyPending,
    /// The provider refused the request; the session is over
    #[error("reward unavailable")]
    Rejected,
}

#[derive(Debug, Clone, Copy)]
enum RewardMessage {
    Granted { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Motion,
    Spawn,
    Score,
    InvincibilityExpiry,
}

/// One play session at a time, reusable across sessions
pub struct Session {
    tuning: Tuning,
    state: SimulationState,
    rng: Pcg32,
    motion: IntervalTimer,
    spawner: IntervalTimer,
    scorer: IntervalTimer,
    invincibility: Deadline,
    /// Baseline for the next motion tick's elapsed time
    last_update: f64,
    /// Bumped on every start/reset so stale reward grants are ignored
    generation: u64,
    reward_tx: Sender<RewardMessage>,
    reward_rx: Receiver<RewardMessage>,
    reward_pending: bool,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let (reward_tx, reward_rx) = channel();
        Self {
            state: SimulationState::new(&tuning),
            rng: Pcg32::seed_from_u64(seed),
            motion: IntervalTimer::new(tuning.motion_interval),
            spawner: IntervalTimer::new(tuning.spawn_interval),
            scorer: IntervalTimer::new(tuning.score_interval()),
            invincibility: Deadline::new(),
            last_update: 0.0,
            generation: 0,
            reward_tx,
            reward_rx,
            reward_pending: false,
            events: Vec::new(),
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Invincibility expiry instant, while the countdown is live
    pub fn invincible_until(&self) -> Option<f64> {
        self.invincibility.at()
    }

    pub fn is_reward_pending(&self) -> bool {
        self.reward_pending
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // === Lifecycle ===

    /// Begin a fresh session
    pub fn start(&mut self, now: f64) {
        self.generation += 1;
        self.reward_pending = false;
        self.invincibility.cancel();
        self.state = self.state.new_session(&self.tuning);
        self.start_timers(now);
        log::info!("Session started");
        self.events.push(SessionEvent::Started);
    }

    /// Freeze all periodic tasks. Returns false if not running.
    pub fn pause(&mut self, now: f64) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.state = SimulationState {
            paused: true,
            ..self.state.clone()
        };
        self.cancel_timers();
        self.invincibility.freeze(now);
        log::info!("Session paused at score {}", self.state.score);
        self.events.push(SessionEvent::Paused);
        true
    }

    /// Restart periodic tasks; paused time never counts as elapsed
    pub fn resume(&mut self, now: f64) -> bool {
        if !(self.state.running && self.state.paused) {
            return false;
        }
        self.state = SimulationState {
            paused: false,
            ..self.state.clone()
        };
        self.start_timers(now);
        self.invincibility.thaw(now);
        log::info!("Session resumed");
        self.events.push(SessionEvent::Resumed);
        true
    }

    /// Halt everything, leaving the state inspectable.
    ///
    /// An open revive decision is closed and any outstanding reward grant
    /// is orphaned, so nothing can restart the tasks afterwards.
    pub fn stop(&mut self) {
        self.cancel_timers();
        self.invincibility.cancel();
        self.generation += 1;
        self.reward_pending = false;

        let reviving = self.state.life == LifePhase::ReviveAvailable;
        if self.state.running || self.state.paused || reviving {
            let mut next = self.state.clone();
            next.running = false;
            next.paused = false;
            if reviving {
                next.life = LifePhase::Dead;
            }
            self.state = next;
            log::info!("Session stopped at score {}", self.state.score);
            self.events.push(SessionEvent::Stopped);
        }
    }

    /// Abandon the current session and return to idle
    pub fn reset(&mut self) {
        self.cancel_timers();
        self.invincibility.cancel();
        self.generation += 1;
        self.reward_pending = false;
        self.state = self.state.reset(&self.tuning);
    }

    // === Input ===

    /// Touch down. Starts a session when idle or after a final death.
    pub fn drag_start(&mut self, now: f64) -> bool {
        let idle = !self.state.running && !self.state.paused;
        if idle && self.state.life != LifePhase::ReviveAvailable {
            self.start(now);
            return true;
        }
        false
    }

    /// Relative drag movement; ignored unless running and unpaused
    pub fn drag(&mut self, delta: Vec2) {
        if let Some(next) = move_player(&self.state, delta, &self.tuning) {
            self.state = next;
        }
    }

    // === Revive ===

    /// Ask the provider for a rewarded interaction
    pub fn request_revive(&mut self, ads: &mut dyn AdProvider) -> Result<(), ReviveError> {
        if self.state.life != LifePhase::ReviveAvailable {
            return Err(ReviveError::NotAvailable);
        }
        if self.reward_pending {
            return Err(ReviveError::AlreadyPending);
        }

        let tx = self.reward_tx.clone();
        let generation = self.generation;
        let accepted = ads.request_reward(Box::new(move || {
            // Receiver lives as long as the session
            let _ = tx.send(RewardMessage::Granted { generation });
        }));

        if accepted {
            self.reward_pending = true;
            self.events.push(SessionEvent::ReviveRequested);
            Ok(())
        } else {
            log::warn!("Reward request rejected; ending session");
            self.events.push(SessionEvent::ReviveUnavailable);
            self.end_session();
            Err(ReviveError::Rejected)
        }
    }

    /// Player passed on the revive (or gave up waiting)
    pub fn decline_revive(&mut self) -> bool {
        if self.state.life != LifePhase::ReviveAvailable {
            return false;
        }
        self.reward_pending = false;
        self.end_session();
        true
    }

    // === Scheduling ===

    /// Run every task that came due up to `now`
    pub fn advance(&mut self, now: f64) {
        self.deliver_rewards(now);

        let max = self.tuning.max_catch_up;
        let mut firings: Vec<(f64, Task)> = Vec::new();
        firings.extend(self.motion.due(now, max).into_iter().map(|t| (t, Task::Motion)));
        firings.extend(self.spawner.due(now, max).into_iter().map(|t| (t, Task::Spawn)));
        firings.extend(self.scorer.due(now, max).into_iter().map(|t| (t, Task::Score)));
        if let Some(at) = self.invincibility.poll(now) {
            firings.push((at, Task::InvincibilityExpiry));
        }
        // Stable: ties keep motion, spawn, score, expiry order
        firings.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (at, task) in firings {
            match task {
                Task::Motion => self.on_motion(at),
                Task::Spawn => self.on_spawn(),
                Task::Score => self.on_score(),
                Task::InvincibilityExpiry => self.on_invincibility_expired(),
            }
        }
    }

    fn start_timers(&mut self, now: f64) {
        self.last_update = now;
        self.motion.start(now);
        self.spawner.start(now);
        self.scorer.start(now);
    }

    fn cancel_timers(&mut self) {
        self.motion.cancel();
        self.spawner.cancel();
        self.scorer.cancel();
    }

    fn deliver_rewards(&mut self, now: f64) {
        while let Ok(RewardMessage::Granted { generation }) = self.reward_rx.try_recv() {
            if generation != self.generation || self.state.life != LifePhase::ReviveAvailable {
                log::debug!("Ignoring stale reward grant");
                continue;
            }
            self.revive(now);
        }
    }

    fn revive(&mut self, now: f64) {
        self.state = apply_revive(&self.state, &self.tuning);
        self.reward_pending = false;
        self.start_timers(now);
        self.invincibility.arm(now, self.tuning.invincibility_duration);
        let invincible_until = now + self.tuning.invincibility_duration;
        log::info!("Revived; invincible until {invincible_until:.2}");
        self.events.push(SessionEvent::Revived { invincible_until });
    }

    fn on_motion(&mut self, at: f64) {
        if !self.state.is_active() {
            return;
        }
        // Measured from the previous tick, so time skipped by the catch-up
        // cap lands in this tick rather than being lost
        let dt = (at - self.last_update) as f32;
        self.last_update = at;

        match advance_obstacles(&self.state, dt, &self.tuning) {
            TickOutcome::Advanced(next) => self.state = next,
            TickOutcome::Collided { obstacle } => self.on_collision(obstacle),
            TickOutcome::Idle => {}
        }
    }

    fn on_spawn(&mut self) {
        if let Some(next) = spawn_obstacle(&self.state, &self.tuning, &mut self.rng) {
            self.state = next;
            if let Some(obstacle) = self.state.obstacles.last() {
                self.events.push(SessionEvent::Spawned { id: obstacle.id });
            }
        }
    }

    fn on_score(&mut self) {
        if let Some(next) = accrue_score(&self.state, &self.tuning) {
            self.state = next;
        }
    }

    fn on_invincibility_expired(&mut self) {
        self.state = expire_invincibility(&self.state);
        log::info!("Invincibility expired");
        self.events.push(SessionEvent::InvincibilityExpired);
    }

    /// Pre-tick state is kept; only the lifecycle flags change
    fn on_collision(&mut self, obstacle: ObstacleId) {
        self.cancel_timers();
        let revive_available = self.state.has_extra_life;
        self.state = SimulationState {
            running: false,
            paused: false,
            life: if revive_available {
                LifePhase::ReviveAvailable
            } else {
                LifePhase::Dead
            },
            ..self.state.clone()
        };
        log::info!(
            "Collision with {:?} at score {} (revive available: {revive_available})",
            obstacle,
            self.state.score
        );
        self.events.push(SessionEvent::Collision {
            obstacle,
            score: self.state.score,
            revive_available,
        });
        if !revive_available {
            self.announce_end();
        }
    }

    fn end_session(&mut self) {
        self.state = SimulationState {
            life: LifePhase::Dead,
            running: false,
            paused: false,
            ..self.state.clone()
        };
        self.announce_end();
    }

    fn announce_end(&mut self) {
        log::info!("Session ended with score {}", self.state.score);
        self.events.push(SessionEvent::SessionEnded {
            score: self.state.score,
        });
    }
}
