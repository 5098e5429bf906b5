//! Dodge Rush - a falling-obstacle dodging arcade game
//!
//! Core modules:
//! - `sim`: Simulation (spawning, motion, collisions, revive)
//! - `session`: Timer-driven session lifecycle around the simulation
//! - `persistence`: Key-value storage backends and typed game keys
//! - `platform`: Ads and haptic/audio feedback
//! - `tuning`: Data-driven game balance

pub mod app;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod timer;
pub mod tuning;

pub use app::App;
pub use highscores::{Records, SessionReport};
pub use session::{ReviveError, Session, SessionEvent};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Play area (game units, portrait phone proportions)
    pub const AREA_WIDTH: f32 = 400.0;
    pub const AREA_HEIGHT: f32 = 640.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Player starts this far above the bottom edge
    pub const PLAYER_START_OFFSET: f32 = 120.0;
    pub const TOP_MARGIN: f32 = 60.0;
    pub const BOTTOM_MARGIN: f32 = 20.0;

    /// Obstacle side length range (inclusive)
    pub const MIN_OBSTACLE_SIZE: f32 = 36.0;
    pub const MAX_OBSTACLE_SIZE: f32 = 64.0;
    /// Seconds between obstacle spawns
    pub const SPAWN_INTERVAL: f64 = 1.0;

    /// Fall speed at session start (units/s)
    pub const INITIAL_SPEED: f32 = 150.0;
    /// Fall speed gained per second (units/s²)
    pub const ACCEL_RATE: f32 = 2.0;
    /// Motion tick cadence (~60 Hz)
    pub const MOTION_INTERVAL: f64 = 0.016;

    pub const SCORE_PER_SECOND: u32 = 10;
    /// Score ticks per second (100ms cadence)
    pub const SCORE_TICKS_PER_SECOND: u32 = 10;

    /// Revive pushes obstacles at least this far above the player
    pub const SAFE_MARGIN: f32 = 150.0;
    pub const INVINCIBILITY_DURATION: f64 = 5.0;

    /// Maximum firings per timer per pump to prevent spiral of death
    pub const MAX_CATCH_UP: u32 = 8;

    /// Interstitial ad every N games
    pub const INTERSTITIAL_EVERY: u64 = 3;
    /// Mock rewarded ad length (seconds)
    pub const MOCK_REWARD_DELAY: f64 = 1.0;
}

/// Install the platform logger. Safe to call more than once.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
    }
}
