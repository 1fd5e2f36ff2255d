//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in `GameState`. Audio and
//! phase changes leave the simulation as queued `GameEvent`s.

use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::phase::{AssetProgress, Crossfade, GamePhase, TitleScreen};
use super::player::Player;
use super::streamer::LevelStreamer;
use crate::error::GameResult;
use crate::input::ControlTracker;

/// Loudness of music tracks at full level
pub const MUSIC_VOLUME: f32 = 0.6;
/// Background track volume lost per tick while fading to black
pub const AMBIENT_FADE_STEP: f32 = 0.01;

/// Named sound samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Background,
    Title,
    Victory,
    Defeat,
    Mushroom,
    Berry,
    Jump,
    Fall,
    Grab,
}

impl SoundCue {
    pub const ALL: [SoundCue; 9] = [
        SoundCue::Background,
        SoundCue::Title,
        SoundCue::Victory,
        SoundCue::Defeat,
        SoundCue::Mushroom,
        SoundCue::Berry,
        SoundCue::Jump,
        SoundCue::Fall,
        SoundCue::Grab,
    ];

    /// Asset name of the sample
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Background => "background",
            SoundCue::Title => "title",
            SoundCue::Victory => "victory",
            SoundCue::Defeat => "defeat",
            SoundCue::Mushroom => "mushroom",
            SoundCue::Berry => "berry",
            SoundCue::Jump => "jump",
            SoundCue::Fall => "fall",
            SoundCue::Grab => "grab",
        }
    }

    /// Sample file the cue is loaded from
    pub fn file_name(self) -> &'static str {
        match self {
            SoundCue::Background => "Abstraction04-running.wav",
            SoundCue::Title => "Abstraction08-title.wav",
            SoundCue::Victory => "Abstraction01-victory.wav",
            SoundCue::Defeat => "Abstraction05-defeat.wav",
            SoundCue::Mushroom => "mushroom.wav",
            SoundCue::Berry => "berry.wav",
            SoundCue::Jump => "jump.wav",
            SoundCue::Fall => "fall.wav",
            SoundCue::Grab => "grab.wav",
        }
    }

    /// Level a one-shot cue plays at
    pub fn base_volume(self) -> f32 {
        match self {
            SoundCue::Jump | SoundCue::Grab => 0.5,
            SoundCue::Mushroom | SoundCue::Berry | SoundCue::Fall => 0.8,
            _ => MUSIC_VOLUME,
        }
    }

    /// Music tracks scale with the music volume, the rest with sfx
    pub fn is_music(self) -> bool {
        matches!(
            self,
            SoundCue::Background | SoundCue::Title | SoundCue::Victory | SoundCue::Defeat
        )
    }
}

/// Side effects produced by a tick, drained by the platform shell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    PlayCue { cue: SoundCue, volume: f32 },
    SetCueVolume { cue: SoundCue, volume: f32 },
    StopAll,
    SetMuted(bool),
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    /// Seed for obstacle generation
    pub seed: u64,
    pub phase: GamePhase,
    pub title_screen: TitleScreen,
    /// Simulation clock in milliseconds; only advances during Play
    pub sim_clock_ms: f64,
    /// Ticks processed in any phase
    pub time_ticks: u64,
    pub player: Player,
    pub enemy: Enemy,
    pub streamer: LevelStreamer,
    pub crossfade: Crossfade,
    /// Background volume while the result crossfade darkens
    pub ambient_volume: f32,
    /// Victory/defeat cue volume while the result crossfade brightens
    pub result_volume: f32,
    pub assets: AssetProgress,
    pub controls: ControlTracker,
    /// Mute chosen by the player (pausing mutes on top of this)
    pub user_muted: bool,
    /// Runs started since launch
    pub runs: u32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh state in Loading, waiting for `expected_assets` reports
    pub fn new(seed: u64, expected_assets: u32) -> Self {
        Self {
            seed,
            phase: GamePhase::Loading,
            title_screen: TitleScreen::default(),
            sim_clock_ms: 0.0,
            time_ticks: 0,
            player: Player::new(),
            enemy: Enemy::new(),
            streamer: LevelStreamer::new(seed),
            crossfade: Crossfade::new(),
            ambient_volume: MUSIC_VOLUME,
            result_volume: 0.0,
            assets: AssetProgress::new(expected_assets),
            controls: ControlTracker::default(),
            user_muted: false,
            runs: 0,
            events: Vec::new(),
        }
    }

    /// Record the outcome of one asset load.
    ///
    /// A failure is kept (Loading never completes) and handed back.
    pub fn report_asset(&mut self, result: GameResult<()>) -> GameResult<()> {
        match result {
            Ok(()) => {
                self.assets.loaded();
                Ok(())
            }
            Err(err) => {
                log::error!("Asset load failed: {}", err);
                self.assets.fail(&err);
                Err(err)
            }
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play_cue(&mut self, cue: SoundCue, volume: f32) {
        self.events.push(GameEvent::PlayCue { cue, volume });
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Muted either by choice or because the game is paused
    #[inline]
    pub fn effective_muted(&self) -> bool {
        self.user_muted || self.phase == GamePhase::Paused
    }

    pub fn toggle_mute(&mut self) {
        self.user_muted = !self.user_muted;
        let muted = self.effective_muted();
        self.events.push(GameEvent::SetMuted(muted));
    }

    /// Show the title menu from its first page, with title music
    pub fn enter_title(&mut self) {
        self.title_screen = TitleScreen::Welcome;
        self.set_phase(GamePhase::Title);
        self.events.push(GameEvent::StopAll);
        self.play_cue(SoundCue::Title, MUSIC_VOLUME);
    }

    /// Reset the world and begin a chase
    pub fn start_run(&mut self) {
        self.runs += 1;
        self.player.reset();
        self.streamer.reset();
        self.streamer.advance(self.player.position().z);
        self.enemy.reset(self.player.position().z, self.sim_clock_ms);
        self.crossfade = Crossfade::new();
        self.ambient_volume = MUSIC_VOLUME;
        self.result_volume = 0.0;

        self.events.push(GameEvent::StopAll);
        self.play_cue(SoundCue::Background, MUSIC_VOLUME);
        self.set_phase(GamePhase::Play);
        log::info!(
            "Run {} started ({} obstacles)",
            self.runs,
            self.streamer.obstacles().len()
        );
    }

    /// Cue that plays over the result screen
    pub fn result_cue(&self) -> Option<SoundCue> {
        match self.phase {
            GamePhase::Win => Some(SoundCue::Victory),
            GamePhase::Lose => Some(SoundCue::Defeat),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    #[test]
    fn test_cue_names_are_unique() {
        let mut names: Vec<_> = SoundCue::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SoundCue::ALL.len());
        assert!(SoundCue::Background.is_music());
        assert!(!SoundCue::Grab.is_music());
    }

    #[test]
    fn test_asset_failure_is_returned_and_kept() {
        let mut state = GameState::new(1, 2);
        assert!(state.report_asset(Ok(())).is_ok());
        let err = state.report_asset(Err(GameError::AssetLoad {
            name: "fox.png".into(),
            reason: "404".into(),
        }));
        assert!(matches!(err, Err(GameError::AssetLoad { .. })));
        assert!(!state.assets.is_complete());
        assert_eq!(state.phase, GamePhase::Loading);
    }

    #[test]
    fn test_start_run_resets_world() {
        let mut state = GameState::new(5, 0);
        state.start_run();
        state.player.body.position.z = -500.0;
        state.player.fall(state.sim_clock_ms);
        state.enemy.body.position.z = -400.0;
        state.drain_events();

        state.start_run();
        assert_eq!(state.phase, GamePhase::Play);
        assert_eq!(state.player.position().z, 0.0);
        assert!(!state.player.is_tumbling());
        assert_eq!(state.enemy.position().z, crate::consts::ENEMY_START_Z);
        assert_eq!(state.streamer.level, 0);
        assert!(state.streamer.goal().is_some());
        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::StopAll);
        assert_eq!(
            events[1],
            GameEvent::PlayCue { cue: SoundCue::Background, volume: MUSIC_VOLUME }
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_pause_implies_mute() {
        let mut state = GameState::new(5, 0);
        state.start_run();
        assert!(!state.effective_muted());
        state.set_phase(GamePhase::Paused);
        assert!(state.effective_muted());
        state.set_phase(GamePhase::Play);
        state.toggle_mute();
        assert!(state.effective_muted());
        assert_eq!(state.drain_events().last(), Some(&GameEvent::SetMuted(true)));
    }
}
