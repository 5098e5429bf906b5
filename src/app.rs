//! Menu-level glue around a [`Session`]
//!
//! Ties the session to the store, ad provider and feedback channel: counts
//! games, shows interstitials, persists settings and records, and turns
//! session events into haptics and sounds.

use glam::Vec2;

use crate::highscores::{Records, SessionReport};
use crate::persistence::{GameStore, KeyValueStore};
use crate::platform::{AdProvider, Feedback, HapticKind, SoundEffect};
use crate::session::{ReviveError, Session, SessionEvent};
use crate::settings::Settings;
use crate::tuning::Tuning;

pub struct App<S, A, F> {
    store: GameStore<S>,
    ads: A,
    feedback: F,
    settings: Settings,
    records: Records,
    session: Session,
    last_report: Option<SessionReport>,
}

impl<S, A, F> App<S, A, F>
where
    S: KeyValueStore,
    A: AdProvider,
    F: Feedback,
{
    pub fn new(tuning: Tuning, store: S, mut ads: A, feedback: F, seed: u64) -> Self {
        ads.initialize();
        let store = GameStore::new(store);
        let settings = Settings::load(&store);
        let records = Records::load(&store);
        log::info!(
            "Best score {}, {} games played",
            records.high_score,
            records.games_played
        );
        Self {
            store,
            ads,
            feedback,
            settings,
            records,
            session: Session::new(tuning, seed),
            last_report: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn records(&self) -> Records {
        self.records
    }

    /// Report for the most recently finished session
    pub fn last_report(&self) -> Option<SessionReport> {
        self.last_report
    }

    pub fn ads(&self) -> &A {
        &self.ads
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn store(&self) -> &GameStore<S> {
        &self.store
    }

    /// Enter the game screen: count the game, maybe show an interstitial,
    /// and wait for the first touch. Returns whether an interstitial ran.
    pub fn play(&mut self) -> bool {
        let count = self.store.increment_games_played();
        self.records.games_played = count;
        self.session.reset();
        self.last_report = None;

        let every = self.session.tuning().interstitial_every;
        if every > 0 && count % every == 0 {
            return self.ads.show_interstitial();
        }
        false
    }

    pub fn drag_start(&mut self, now: f64) -> bool {
        self.session.drag_start(now)
    }

    pub fn drag(&mut self, delta: Vec2) {
        self.session.drag(delta);
    }

    pub fn pause(&mut self, now: f64) -> bool {
        self.session.pause(now)
    }

    pub fn resume(&mut self, now: f64) -> bool {
        self.session.resume(now)
    }

    /// Leave from the pause menu; the score is not recorded
    pub fn quit(&mut self) {
        self.session.stop();
        self.session.reset();
    }

    /// Watch an ad to continue
    pub fn continue_with_ad(&mut self) -> Result<(), ReviveError> {
        let result = self.session.request_revive(&mut self.ads);
        if let Err(e) = result {
            log::info!("Cannot continue: {e}");
        }
        result
    }

    /// End the session from the game-over prompt
    pub fn finish(&mut self) -> bool {
        self.session.decline_revive()
    }

    /// Pump ads and the session, then react to what happened
    pub fn update(&mut self, now: f64) -> Vec<SessionEvent> {
        self.ads.poll(now);
        self.session.advance(now);

        let events = self.session.drain_events();
        for event in &events {
            self.handle_event(event);
        }
        events
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.settings.music_enabled = enabled;
        self.save_settings();
    }

    pub fn set_sfx_enabled(&mut self, enabled: bool) {
        self.settings.sfx_enabled = enabled;
        self.save_settings();
    }

    /// In-memory settings stay applied even if the write fails
    fn save_settings(&mut self) {
        if let Err(e) = self.settings.save(&mut self.store) {
            log::warn!("Failed to save settings: {e}");
        }
    }

    fn play_sound(&mut self, effect: SoundEffect) {
        if self.settings.sfx_enabled {
            self.feedback.play(effect);
        }
    }

    fn handle_event(&mut self, event: &SessionEvent) {
        match *event {
            SessionEvent::Collision { .. } => {
                self.feedback.haptic(HapticKind::Error);
                self.play_sound(SoundEffect::Collision);
            }
            SessionEvent::Revived { .. } => {
                self.feedback.haptic(HapticKind::Success);
                self.play_sound(SoundEffect::Revive);
            }
            SessionEvent::SessionEnded { score } => {
                let report = self.records.report_session_end(&mut self.store, score);
                self.play_sound(if report.new_record {
                    SoundEffect::HighScore
                } else {
                    SoundEffect::GameOver
                });
                self.last_report = Some(report);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::platform::{MockAdProvider, UnavailableAdProvider};

    #[derive(Default)]
    struct RecordingFeedback {
        haptics: Vec<HapticKind>,
        sounds: Vec<SoundEffect>,
    }

    impl Feedback for RecordingFeedback {
        fn haptic(&mut self, kind: HapticKind) {
            self.haptics.push(kind);
        }

        fn play(&mut self, effect: SoundEffect) {
            self.sounds.push(effect);
        }
    }

    /// Player fills the whole width and every obstacle lands on it
    fn doomed_tuning() -> Tuning {
        Tuning {
            area_width: 40.0,
            min_obstacle_size: 40.0,
            max_obstacle_size: 40.0,
            spawn_interval: 0.5,
            ..Default::default()
        }
    }

    fn run_until<S, A, F>(
        app: &mut App<S, A, F>,
        from: f64,
        done: impl Fn(&[SessionEvent]) -> bool,
    ) -> f64
    where
        S: KeyValueStore,
        A: AdProvider,
        F: Feedback,
    {
        let mut now = from;
        for _ in 0..5_000 {
            now += 0.016;
            let events = app.update(now);
            if done(&events) {
                return now;
            }
        }
        panic!("condition not reached");
    }

    fn collided(events: &[SessionEvent]) -> bool {
        events
            .iter()
            .any(|e| matches!(e, SessionEvent::Collision { .. }))
    }

    #[test]
    fn test_interstitial_every_third_game() {
        let mut app = App::new(
            Tuning::default(),
            MemoryStore::new(),
            MockAdProvider::default(),
            RecordingFeedback::default(),
            1,
        );
        assert!(app.ads().is_initialized());
        let shown: Vec<bool> = (0..6).map(|_| app.play()).collect();
        assert_eq!(shown, vec![false, false, true, false, false, true]);
        assert_eq!(app.records().games_played, 6);
        assert_eq!(app.store().get_games_played(), 6);
    }

    #[test]
    fn test_full_game_with_revive_records_high_score() {
        let mut app = App::new(
            doomed_tuning(),
            MemoryStore::new(),
            MockAdProvider::new(1.0),
            RecordingFeedback::default(),
            7,
        );
        app.play();
        assert!(app.drag_start(0.0));

        let now = run_until(&mut app, 0.0, collided);
        assert_eq!(app.feedback().haptics, vec![HapticKind::Error]);
        assert!(app.last_report().is_none());

        app.continue_with_ad().unwrap();
        let now = run_until(&mut app, now, |events| {
            events
                .iter()
                .any(|e| matches!(e, SessionEvent::Revived { .. }))
        });
        assert!(app.session().state().player.invincible);

        run_until(&mut app, now, |events| {
            events
                .iter()
                .any(|e| matches!(e, SessionEvent::SessionEnded { .. }))
        });

        let report = app.last_report().expect("session reported");
        assert!(report.new_record);
        assert!(report.score > 0);
        assert_eq!(app.store().get_high_score(), report.score);
        assert_eq!(app.records().high_score, report.score);
        assert_eq!(
            app.feedback().sounds.last(),
            Some(&SoundEffect::HighScore)
        );
    }

    #[test]
    fn test_rejected_ad_finishes_session() {
        let mut app = App::new(
            doomed_tuning(),
            MemoryStore::new(),
            UnavailableAdProvider,
            RecordingFeedback::default(),
            3,
        );
        app.play();
        app.drag_start(0.0);
        let now = run_until(&mut app, 0.0, collided);

        assert_eq!(app.continue_with_ad(), Err(ReviveError::Rejected));
        let events = app.update(now + 0.016);
        assert!(events.contains(&SessionEvent::ReviveUnavailable));

        let report = app.last_report().expect("session reported");
        assert_eq!(report.score, app.session().state().score);
        assert!(app.session().state().has_extra_life);
        assert_eq!(app.feedback().haptics, vec![HapticKind::Error]);
    }

    #[test]
    fn test_muted_sfx_still_vibrates() {
        let mut app = App::new(
            doomed_tuning(),
            MemoryStore::new(),
            MockAdProvider::default(),
            RecordingFeedback::default(),
            5,
        );
        app.set_sfx_enabled(false);
        assert!(!app.store().get_sfx_enabled());

        app.play();
        app.drag_start(0.0);
        run_until(&mut app, 0.0, collided);
        app.finish();
        app.update(100.0);

        assert_eq!(app.feedback().haptics, vec![HapticKind::Error]);
        assert!(app.feedback().sounds.is_empty());
        assert!(app.last_report().is_some());
    }

    #[test]
    fn test_quit_does_not_record() {
        let mut app = App::new(
            Tuning::default(),
            MemoryStore::new(),
            MockAdProvider::default(),
            RecordingFeedback::default(),
            9,
        );
        app.play();
        app.drag_start(0.0);
        app.update(0.5);
        assert!(app.pause(0.5));
        app.quit();
        app.update(1.0);
        assert!(app.last_report().is_none());
        assert_eq!(app.store().get_high_score(), 0);
        assert!(!app.session().state().running);
    }

    #[test]
    fn test_settings_persist() {
        let mut app = App::new(
            Tuning::default(),
            MemoryStore::new(),
            MockAdProvider::default(),
            RecordingFeedback::default(),
            1,
        );
        app.set_music_enabled(false);
        let store = app.store().inner().clone();

        let app = App::new(
            Tuning::default(),
            store,
            MockAdProvider::default(),
            RecordingFeedback::default(),
            1,
        );
        assert!(!app.settings().music_enabled);
        assert!(app.settings().sfx_enabled);
    }

    #[test]
    fn test_settings_applied_when_write_fails() {
        let mut backend = MemoryStore::new();
        backend.fail_writes(true);
        let mut app = App::new(
            Tuning::default(),
            backend,
            MockAdProvider::default(),
            RecordingFeedback::default(),
            1,
        );
        app.set_sfx_enabled(false);
        assert!(!app.settings().sfx_enabled);
        assert!(app.store().get_sfx_enabled());
    }
}
