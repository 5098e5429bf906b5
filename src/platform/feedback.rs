//! Haptic and audio feedback
//!
//! Fire-and-forget: implementations swallow their own failures so a missing
//! audio device or vibration motor never blocks a state transition.

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player hit an obstacle
    Collision,
    /// Extra life consumed
    Revive,
    /// Session over for good
    GameOver,
    /// New high score
    HighScore,
}

/// Vibration pattern types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticKind {
    Error,
    Success,
}

/// Host feedback channel
pub trait Feedback {
    fn haptic(&mut self, kind: HapticKind);
    fn play(&mut self, effect: SoundEffect);
}

/// Feedback that only logs; used headless and on native
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn haptic(&mut self, kind: HapticKind) {
        log::debug!("haptic: {kind:?}");
    }

    fn play(&mut self, effect: SoundEffect) {
        log::debug!("sfx: {effect:?}");
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebFeedback;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Feedback, HapticKind, SoundEffect};

    /// Web Audio oscillators plus `navigator.vibrate`
    pub struct WebFeedback {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for WebFeedback {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebFeedback {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 0.8 }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Single enveloped sweep from `from` Hz to `to` Hz
        fn sweep(
            &self,
            ctx: &AudioContext,
            from: f32,
            to: f32,
            secs: f64,
            osc_type: OscillatorType,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(self.volume * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + secs)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + secs)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + secs + 0.05).ok();
        }
    }

    impl Feedback for WebFeedback {
        fn haptic(&mut self, kind: HapticKind) {
            let ms = match kind {
                HapticKind::Error => 200,
                HapticKind::Success => 50,
            };
            if let Some(window) = web_sys::window() {
                let _ = window.navigator().vibrate_with_duration(ms);
            }
        }

        fn play(&mut self, effect: SoundEffect) {
            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let (from, to, secs, osc_type) = match effect {
                SoundEffect::Collision => (220.0, 55.0, 0.25, OscillatorType::Sawtooth),
                SoundEffect::Revive => (330.0, 880.0, 0.4, OscillatorType::Sine),
                SoundEffect::GameOver => (440.0, 110.0, 0.8, OscillatorType::Triangle),
                SoundEffect::HighScore => (523.0, 1046.0, 0.5, OscillatorType::Square),
            };
            self.sweep(ctx, from, to, secs, osc_type);
        }
    }
}
