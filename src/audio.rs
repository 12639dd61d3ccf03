//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Audio is best-effort: any failure here leaves the game untouched.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Waveform, start Hz, end Hz, delay (s), length (s), level
type Voice = (OscillatorType, f32, f32, f64, f64, f32);

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Dot defeated or picked up
    Collect,
    /// Dot hit but still standing
    Hit,
    /// Walked through the door
    Door,
    /// Run ended
    GameOver,
}

impl From<GameEvent> for SoundEffect {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::Collected => SoundEffect::Collect,
            GameEvent::Damaged => SoundEffect::Hit,
            GameEvent::DoorEntered => SoundEffect::Door,
            GameEvent::GameOver => SoundEffect::GameOver,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play the sound for every event emitted since the last frame
    pub fn play_events(&self, events: &[GameEvent]) {
        for event in events {
            self.play((*event).into());
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Collect => self.play_collect(ctx, vol),
            SoundEffect::Hit => self.play_hit(ctx, vol),
            SoundEffect::Door => self.play_door(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
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

    /// Play voices sharing one output level
    fn play_voices(&self, ctx: &AudioContext, vol: f32, voices: &[Voice]) {
        for voice in voices {
            self.glide(ctx, vol, voice);
        }
    }

    /// One voice: pitch glides between two frequencies while the level decays
    fn glide(&self, ctx: &AudioContext, vol: f32, voice: &Voice) {
        let &(wave, from, to, delay, length, level) = voice;
        let Some((osc, gain)) = self.create_osc(ctx, from, wave) else {
            return;
        };
        let t = ctx.current_time() + delay;

        gain.gain().set_value_at_time(vol * level, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + length)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        if to != from {
            osc.frequency()
                .linear_ramp_to_value_at_time(to, t + length)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + length + 0.02).ok();
    }

    /// Collect - two-note coin blip
    fn play_collect(&self, ctx: &AudioContext, vol: f32) {
        self.play_voices(
            ctx,
            vol,
            &[
                (OscillatorType::Square, 880.0, 880.0, 0.0, 0.07, 0.12),
                (OscillatorType::Square, 1320.0, 1320.0, 0.07, 0.16, 0.12),
            ],
        );
    }

    /// Hit - short dull thud
    fn play_hit(&self, ctx: &AudioContext, vol: f32) {
        self.play_voices(
            ctx,
            vol,
            &[(OscillatorType::Triangle, 220.0, 90.0, 0.0, 0.08, 0.35)],
        );
    }

    /// Door - low-to-high whoosh with a shimmer on top
    fn play_door(&self, ctx: &AudioContext, vol: f32) {
        self.play_voices(
            ctx,
            vol,
            &[
                (OscillatorType::Sawtooth, 120.0, 960.0, 0.0, 0.35, 0.15),
                (OscillatorType::Sine, 1920.0, 1920.0, 0.3, 0.25, 0.1),
            ],
        );
    }

    /// Game over - long slide down to a low drone
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        self.play_voices(
            ctx,
            vol,
            &[
                (OscillatorType::Sawtooth, 330.0, 55.0, 0.0, 0.9, 0.2),
                (OscillatorType::Sine, 55.0, 55.0, 0.6, 0.8, 0.3),
            ],
        );
    }
}
