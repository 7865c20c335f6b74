//! Sound cue routing
//!
//! The simulation emits [`SoundCue`] values; this module carries them to
//! whatever playback backend the embedder provides. Synthesis and playback
//! live entirely with the backend - a missing or failed backend leaves the
//! game silent and never reaches the turn clock.

use crate::sim::SoundCue;

/// Playback side of the audio collaborator
pub trait AudioBackend {
    /// Play one cue at the given effective volume (0.0 - 1.0)
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Audio manager for the game: volume/mute policy over an optional backend
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
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
    /// Manager with no backend: every cue is a silent no-op
    pub fn new() -> Self {
        Self {
            backend: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn with_backend(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::new()
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

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Forward a cue to the backend when audible
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        backend.play(cue, vol);
    }
}
