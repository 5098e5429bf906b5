//! Dodge Rush headless runner
//!
//! Plays sessions with a simple autopilot on a simulated clock and keeps
//! records in a JSON store, exercising the same code path a UI host would.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;
    use glam::Vec2;

    use dodge_rush::persistence::JsonFileStore;
    use dodge_rush::platform::{LogFeedback, MockAdProvider};
    use dodge_rush::sim::SimulationState;
    use dodge_rush::timer::{Clock, ManualClock};
    use dodge_rush::{App, SessionEvent, Tuning};

    /// Host frame length (seconds)
    const FRAME: f64 = 1.0 / 60.0;
    /// Fastest the autopilot drags per frame
    const MAX_DRAG: f32 = 12.0;
    /// Obstacles further above the player than this are ignored
    const LOOKAHEAD: f32 = 260.0;

    #[derive(Parser, Debug)]
    #[command(name = "dodge-rush")]
    #[command(about = "Play Dodge Rush headlessly with an autopilot")]
    struct Cli {
        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of games to play
        #[arg(long, default_value_t = 1)]
        games: u32,

        /// Quit a game after this many simulated seconds
        #[arg(long, default_value_t = 300.0)]
        max_seconds: f64,

        /// Save file for records and settings
        #[arg(long, default_value = "dodge-rush-save.json")]
        store: PathBuf,

        /// JSON tuning overrides
        #[arg(long)]
        tuning: Option<PathBuf>,
    }

    /// Pick the least threatened column and drift toward it
    fn autopilot(state: &SimulationState, tuning: &Tuning) -> Vec2 {
        let player = &state.player;
        let (min_x, max_x) = tuning.player_x_range();

        let danger = |x: f32| -> f32 {
            state
                .obstacles
                .iter()
                .filter(|o| {
                    let above = player.pos.y - (o.pos.y + o.size.y);
                    (-player.size.y..LOOKAHEAD).contains(&above)
                        && o.pos.x < x + player.size.x + 4.0
                        && o.pos.x + o.size.x > x - 4.0
                })
                .map(|o| 1.0 + (LOOKAHEAD - (player.pos.y - o.pos.y)).max(0.0))
                .sum()
        };

        let mut best = (danger(player.pos.x), player.pos.x);
        let mut x = min_x;
        while x <= max_x {
            let score = danger(x) + (x - player.pos.x).abs() * 0.01;
            if score < best.0 {
                best = (score, x);
            }
            x += 8.0;
        }

        let dx = (best.1 - player.pos.x).clamp(-MAX_DRAG, MAX_DRAG);
        Vec2::new(dx, 0.0)
    }

    pub fn run() -> anyhow::Result<()> {
        dodge_rush::init_logging();
        let args = Cli::parse();
        let seed = args.seed.unwrap_or_else(rand::random);

        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };
        let store = JsonFileStore::open(&args.store)
            .with_context(|| format!("opening store {}", args.store.display()))?;

        log::info!("Dodge Rush (headless) starting with seed {seed}");
        let mut app = App::new(tuning, store, MockAdProvider::default(), LogFeedback, seed);
        let clock = ManualClock::new(0.0);

        for game in 1..=args.games {
            app.play();
            let started_at = clock.now();
            app.drag_start(started_at);

            loop {
                clock.advance(FRAME);
                let now = clock.now();

                let delta = autopilot(app.session().state(), app.session().tuning());
                app.drag(delta);

                let events = app.update(now);
                for event in &events {
                    if let SessionEvent::Collision {
                        revive_available: true,
                        ..
                    } = event
                    {
                        // Always take the extra life
                        if app.continue_with_ad().is_err() {
                            app.finish();
                        }
                    }
                }

                if events
                    .iter()
                    .any(|e| matches!(e, SessionEvent::SessionEnded { .. }))
                {
                    break;
                }
                if now - started_at > args.max_seconds {
                    log::info!("Time limit reached, quitting game {game}");
                    app.quit();
                    break;
                }
            }

            match app.last_report() {
                Some(report) => println!(
                    "game {game}: score {}{}",
                    report.score,
                    if report.new_record { " (new record!)" } else { "" }
                ),
                None => println!("game {game}: abandoned"),
            }
        }

        let records = app.records();
        println!(
            "best {} over {} games",
            records.high_score, records.games_played
        );
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::CommandFactory;

        #[test]
        fn test_cli_definition() {
            Cli::command().debug_assert();
        }

        #[test]
        fn test_cli_defaults_and_flags() {
            let cli = Cli::try_parse_from(["dodge-rush"]).unwrap();
            assert_eq!(cli.seed, None);
            assert_eq!(cli.games, 1);
            assert_eq!(cli.store, PathBuf::from("dodge-rush-save.json"));

            let cli = Cli::try_parse_from(["dodge-rush", "--seed", "7", "--games", "3"]).unwrap();
            assert_eq!(cli.seed, Some(7));
            assert_eq!(cli.games, 3);
            assert!(Cli::try_parse_from(["dodge-rush", "--bogus"]).is_err());
        }

        #[test]
        fn test_autopilot_leaves_threatened_column() {
            let tuning = Tuning::default();
            let mut state = SimulationState::new(&tuning).new_session(&tuning);
            let id = state.next_obstacle_id();
            let above = state.player.pos - Vec2::new(0.0, 60.0);
            state.obstacles.push(dodge_rush::sim::Obstacle::new(id, above, 40.0, state.speed));

            let delta = autopilot(&state, &tuning);
            assert!(delta.x != 0.0);
            assert!(delta.x.abs() <= MAX_DRAG);
            assert_eq!(delta.y, 0.0);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly
}
