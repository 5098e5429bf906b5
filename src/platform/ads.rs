//! Ad provider interface
//!
//! The rewarded ad gates the one-time revive. Providers accept or reject a
//! request synchronously; a granted reward arrives later through the
//! callback, at most once, and only on success.

/// Invoked by the provider when the reward is granted
pub type RewardCallback = Box<dyn FnOnce()>;

/// Rewarded and interstitial ad source
pub trait AdProvider {
    /// One-time SDK setup
    fn initialize(&mut self) {}

    /// Ask for a rewarded interaction. Returns whether the request was
    /// accepted; `on_granted` fires later only if the user earns the reward.
    fn request_reward(&mut self, on_granted: RewardCallback) -> bool;

    /// Show a full-screen interstitial. Returns whether one was shown.
    fn show_interstitial(&mut self) -> bool {
        false
    }

    /// Let the provider deliver pending callbacks
    fn poll(&mut self, _now: f64) {}
}

struct PendingReward {
    due: f64,
    on_granted: RewardCallback,
}

/// Stand-in provider that always accepts and grants after a fixed delay
pub struct MockAdProvider {
    delay: f64,
    now: f64,
    pending: Vec<PendingReward>,
    initialized: bool,
    pub rewards_requested: u32,
    pub interstitials_shown: u32,
}

impl Default for MockAdProvider {
    fn default() -> Self {
        Self::new(crate::consts::MOCK_REWARD_DELAY)
    }
}

impl MockAdProvider {
    pub fn new(delay: f64) -> Self {
        Self {
            delay,
            now: 0.0,
            pending: Vec::new(),
            initialized: false,
            rewards_requested: 0,
            interstitials_shown: 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Rewards accepted but not yet granted
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl AdProvider for MockAdProvider {
    fn initialize(&mut self) {
        self.initialized = true;
        log::info!("Ads initialized (mock)");
    }

    fn request_reward(&mut self, on_granted: RewardCallback) -> bool {
        self.rewards_requested += 1;
        log::info!("Showing rewarded ad (mock)");
        self.pending.push(PendingReward {
            due: self.now + self.delay,
            on_granted,
        });
        true
    }

    fn show_interstitial(&mut self) -> bool {
        self.interstitials_shown += 1;
        log::info!("Showing interstitial ad (mock)");
        true
    }

    fn poll(&mut self, now: f64) {
        self.now = now;
        let (ready, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;
        for reward in ready {
            (reward.on_granted)();
        }
    }
}

/// Provider with no inventory; every request is rejected
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableAdProvider;

impl AdProvider for UnavailableAdProvider {
    fn request_reward(&mut self, _on_granted: RewardCallback) -> bool {
        false
    }
}
