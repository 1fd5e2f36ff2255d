//! Audio dispatch
//!
//! The simulation only queues `GameEvent`s. `AudioManager` applies the
//! player's volume settings and forwards them to whatever playback backend
//! the platform shell provides.

use crate::settings::Settings;
use crate::sim::{GameEvent, SoundCue};

/// Sample playback provided by the platform
pub trait AudioBackend {
    /// Start a sample from the beginning at the given gain
    fn play_cue(&mut self, name: &str, volume: f32);
    /// Change the gain of a playing sample
    fn set_cue_volume(&mut self, name: &str, volume: f32);
    fn stop_all(&mut self);
    fn set_muted(&mut self, muted: bool);
}

/// Backend that only logs what would be played
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: u32,
}

impl AudioBackend for LogAudio {
    fn play_cue(&mut self, name: &str, volume: f32) {
        self.played += 1;
        log::debug!("play {} at {:.2}", name, volume);
    }

    fn set_cue_volume(&mut self, name: &str, volume: f32) {
        log::trace!("volume {} -> {:.2}", name, volume);
    }

    fn stop_all(&mut self) {
        log::debug!("stop all");
    }

    fn set_muted(&mut self, muted: bool) {
        log::debug!("muted {}", muted);
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    music_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 1.0,
            music_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Build with volumes taken from the player's settings
    pub fn with_settings(backend: B, settings: &Settings) -> Self {
        let mut manager = Self::new(backend);
        manager.apply_settings(settings);
        manager
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.set_sfx_volume(settings.sfx_volume);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.backend.set_muted(muted);
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Gain for a cue at the level the simulation asked for
    fn effective_volume(&self, cue: SoundCue, level: f32) -> f32 {
        let channel = if cue.is_music() {
            self.music_volume
        } else {
            self.sfx_volume
        };
        (level * channel * self.master_volume).clamp(0.0, 1.0)
    }

    /// Volume of the background track
    pub fn set_ambient_volume(&mut self, level: f32) {
        let volume = self.effective_volume(SoundCue::Background, level);
        self.backend
            .set_cue_volume(SoundCue::Background.name(), volume);
    }

    /// Forward drained simulation events to the backend
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::PlayCue { cue, volume } => {
                    let volume = self.effective_volume(cue, volume);
                    self.backend.play_cue(cue.name(), volume);
                }
                GameEvent::SetCueVolume { cue, volume } => {
                    if cue == SoundCue::Background {
                        self.set_ambient_volume(volume);
                    } else {
                        let volume = self.effective_volume(cue, volume);
                        self.backend.set_cue_volume(cue.name(), volume);
                    }
                }
                GameEvent::StopAll => self.backend.stop_all(),
                GameEvent::SetMuted(muted) => self.set_muted(muted),
                GameEvent::PhaseChanged { .. } => {}
            }
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    #[derive(Debug, Default)]
    struct Recording {
        calls: Vec<String>,
    }

    impl AudioBackend for Recording {
        fn play_cue(&mut self, name: &str, volume: f32) {
            self.calls.push(format!("play {name} {volume:.2}"));
        }
        fn set_cue_volume(&mut self, name: &str, volume: f32) {
            self.calls.push(format!("volume {name} {volume:.2}"));
        }
        fn stop_all(&mut self) {
            self.calls.push("stop".into());
        }
        fn set_muted(&mut self, muted: bool) {
            self.calls.push(format!("muted {muted}"));
        }
    }

    #[test]
    fn test_dispatch_applies_channel_volumes() {
        let settings = Settings {
            master_volume: 0.5,
            music_volume: 0.5,
            sfx_volume: 1.0,
            ..Default::default()
        };
        let mut audio = AudioManager::with_settings(Recording::default(), &settings);
        audio.dispatch(&[
            GameEvent::PhaseChanged { from: GamePhase::Title, to: GamePhase::Play },
            GameEvent::StopAll,
            GameEvent::PlayCue { cue: SoundCue::Background, volume: 0.6 },
            GameEvent::PlayCue { cue: SoundCue::Jump, volume: 1.0 },
            GameEvent::SetCueVolume { cue: SoundCue::Background, volume: 0.4 },
            GameEvent::SetMuted(true),
        ]);
        assert_eq!(
            audio.backend().calls,
            vec![
                "stop",
                "play background 0.15",
                "play jump 0.50",
                "volume background 0.10",
                "muted true",
            ]
        );
        assert!(audio.is_muted());
    }

    #[test]
    fn test_volumes_clamped() {
        let mut audio = AudioManager::new(Recording::default());
        audio.set_master_volume(4.0);
        audio.set_ambient_volume(2.0);
        assert_eq!(audio.backend().calls, vec!["volume background 1.00"]);
    }
}
