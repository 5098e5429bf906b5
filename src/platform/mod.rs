//! Platform abstraction layer
//!
//! Host services the game calls into but does not own:
//! - Rewarded/interstitial ads
//! - Haptic and audio feedback

pub mod ads;
pub mod feedback;

pub use ads::{AdProvider, MockAdProvider, RewardCallback, UnavailableAdProvider};
pub use feedback::{Feedback, HapticKind, LogFeedback, SoundEffect};
