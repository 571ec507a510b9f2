//! Audio cues using the Web Audio API
//!
//! Each cue plays the user's recorded sample when one is configured, otherwise
//! a short synthesized tone with an exponential decay. Audio is best effort:
//! failures are logged and never reach gameplay.

use crate::settings::CustomAudio;

/// Default tone volume
pub const DEFAULT_VOLUME: f32 = 0.2;
/// Gain the decay envelope ramps down to
pub const DECAY_FLOOR: f32 = 0.001;

/// Game events that make a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Actor flapped
    Jump,
    /// Collision or out of bounds
    Hit,
    /// Bounded session cleared
    Win,
    /// Actor cleared a pipe
    ObstaclePassed,
    /// Countdown number shown (before it is decremented)
    CountdownTick { remaining: u32 },
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A synthesized tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    /// Seconds
    pub duration: f32,
    pub waveform: Waveform,
    /// Starting gain
    pub volume: f32,
}

impl AudioCue {
    /// Fallback tone for this cue
    pub fn tone(&self) -> Tone {
        let (frequency, duration, waveform, volume) = match *self {
            AudioCue::Jump => (800.0, 0.05, Waveform::Triangle, 0.3),
            AudioCue::Hit => (120.0, 0.4, Waveform::Sawtooth, 0.4),
            AudioCue::Win => (1000.0, 0.3, Waveform::Triangle, 0.3),
            AudioCue::ObstaclePassed => (900.0, 0.07, Waveform::Square, 0.2),
            AudioCue::CountdownTick { remaining } => (
                600.0 + remaining as f32 * 150.0,
                0.15,
                Waveform::Sine,
                DEFAULT_VOLUME,
            ),
        };
        Tone {
            frequency,
            duration,
            waveform,
            volume,
        }
    }

    /// User sample that replaces the tone, if any
    ///
    /// Passing a pipe reuses the jump recording.
    pub fn sample<'a>(&self, audio: &'a CustomAudio) -> Option<&'a str> {
        match self {
            AudioCue::Jump | AudioCue::ObstaclePassed => audio.jump.as_deref(),
            AudioCue::Hit => audio.hit.as_deref(),
            AudioCue::Win => audio.win.as_deref(),
            AudioCue::CountdownTick { .. } => None,
        }
    }
}

/// What a cue resolves to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CuePlan<'a> {
    Sample(&'a str),
    Tone(Tone),
}

/// Plays cues for a session
pub struct AudioCueDispatcher {
    custom: CustomAudio,
    #[cfg(target_arch = "wasm32")]
    ctx: Option<web_sys::AudioContext>,
    /// Context creation failed once; stop trying
    #[cfg(target_arch = "wasm32")]
    unavailable: bool,
}

impl AudioCueDispatcher {
    pub fn new(custom: CustomAudio) -> Self {
        Self {
            custom,
            #[cfg(target_arch = "wasm32")]
            ctx: None,
            #[cfg(target_arch = "wasm32")]
            unavailable: false,
        }
    }

    /// Resolve a cue to a sample or a tone
    pub fn plan(&self, cue: AudioCue) -> CuePlan<'_> {
        match cue.sample(&self.custom) {
            Some(src) => CuePlan::Sample(src),
            None => CuePlan::Tone(cue.tone()),
        }
    }

    /// Play a cue (fire and forget)
    pub fn trigger(&mut self, cue: AudioCue) {
        self.play(cue);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn play(&mut self, cue: AudioCue) {
        log::debug!("Cue {:?} -> {:?}", cue, self.plan(cue));
    }

    #[cfg(target_arch = "wasm32")]
    fn play(&mut self, cue: AudioCue) {
        match self.plan(cue) {
            CuePlan::Sample(src) => play_sample(src),
            CuePlan::Tone(tone) => {
                if let Some(ctx) = self.context() {
                    play_tone(ctx, tone);
                }
            }
        }
    }

    /// Lazily create the audio context and wake it if suspended
    #[cfg(target_arch = "wasm32")]
    fn context(&mut self) -> Option<&web_sys::AudioContext> {
        if self.ctx.is_none() && !self.unavailable {
            match web_sys::AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(_) => {
                    log::warn!("Failed to create AudioContext - tones disabled");
                    self.unavailable = true;
                }
            }
        }

        let ctx = self.ctx.as_ref()?;
        // Browsers require a user gesture before audio can start
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }
}

#[cfg(target_arch = "wasm32")]
fn play_sample(src: &str) {
    use wasm_bindgen_futures::JsFuture;

    let audio = match web_sys::HtmlAudioElement::new_with_src(src) {
        Ok(audio) => audio,
        Err(_) => {
            log::warn!("Failed to create audio element for custom sound");
            return;
        }
    };

    match audio.play() {
        Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
            if JsFuture::from(promise).await.is_err() {
                log::warn!("Custom sound playback was rejected");
            }
        }),
        Err(_) => log::warn!("Custom sound playback failed"),
    }
}

#[cfg(target_arch = "wasm32")]
fn play_tone(ctx: &web_sys::AudioContext, tone: Tone) {
    use web_sys::OscillatorType;

    let (Ok(osc), Ok(gain)) = (ctx.create_oscillator(), ctx.create_gain()) else {
        log::warn!("Failed to create oscillator");
        return;
    };

    osc.set_type(match tone.waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    });
    osc.frequency().set_value(tone.frequency);
    if osc.connect_with_audio_node(&gain).is_err()
        || gain.connect_with_audio_node(&ctx.destination()).is_err()
    {
        log::warn!("Failed to connect audio graph");
        return;
    }

    let t = ctx.current_time();
    let end = t + tone.duration as f64;
    gain.gain().set_value_at_time(tone.volume, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(DECAY_FLOOR, end)
        .ok();

    osc.start().ok();
    osc.stop_with_when(end).ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom() -> CustomAudio {
        CustomAudio {
            jump: Some("jump.webm".into()),
            hit: None,
            win: Some("win.webm".into()),
        }
    }

    #[test]
    fn test_tone_table() {
        assert_eq!(
            AudioCue::Jump.tone(),
            Tone { frequency: 800.0, duration: 0.05, waveform: Waveform::Triangle, volume: 0.3 }
        );
        assert_eq!(
            AudioCue::Hit.tone(),
            Tone { frequency: 120.0, duration: 0.4, waveform: Waveform::Sawtooth, volume: 0.4 }
        );
        assert_eq!(
            AudioCue::Win.tone(),
            Tone { frequency: 1000.0, duration: 0.3, waveform: Waveform::Triangle, volume: 0.3 }
        );
        assert_eq!(
            AudioCue::ObstaclePassed.tone(),
            Tone { frequency: 900.0, duration: 0.07, waveform: Waveform::Square, volume: 0.2 }
        );
    }

    #[test]
    fn test_countdown_pitch_rises_with_remaining() {
        assert_eq!(AudioCue::CountdownTick { remaining: 3 }.tone().frequency, 1050.0);
        assert_eq!(AudioCue::CountdownTick { remaining: 1 }.tone().frequency, 750.0);
        assert_eq!(AudioCue::CountdownTick { remaining: 2 }.tone().volume, DEFAULT_VOLUME);
    }

    #[test]
    fn test_samples_override_tones() {
        let dispatcher = AudioCueDispatcher::new(custom());
        assert_eq!(dispatcher.plan(AudioCue::Jump), CuePlan::Sample("jump.webm"));
        assert_eq!(dispatcher.plan(AudioCue::ObstaclePassed), CuePlan::Sample("jump.webm"));
        assert_eq!(dispatcher.plan(AudioCue::Win), CuePlan::Sample("win.webm"));
        assert_eq!(dispatcher.plan(AudioCue::Hit), CuePlan::Tone(AudioCue::Hit.tone()));
        assert_eq!(
            dispatcher.plan(AudioCue::CountdownTick { remaining: 2 }),
            CuePlan::Tone(AudioCue::CountdownTick { remaining: 2 }.tone())
        );
    }

    #[test]
    fn test_no_custom_audio_uses_tones() {
        let dispatcher = AudioCueDispatcher::new(CustomAudio::default());
        assert_eq!(dispatcher.plan(AudioCue::Jump), CuePlan::Tone(AudioCue::Jump.tone()));
    }

    #[test]
    fn test_trigger_never_fails() {
        let mut dispatcher = AudioCueDispatcher::new(custom());
        dispatcher.trigger(AudioCue::Hit);
        dispatcher.trigger(AudioCue::Jump);
        dispatcher.trigger(AudioCue::CountdownTick { remaining: 1 });
    }
}
