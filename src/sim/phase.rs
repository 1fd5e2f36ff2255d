//! Top-level phases and the timed pieces that gate them

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for textures and samples
    Loading,
    /// Title and menu screens
    Title,
    /// Active chase
    Play,
    /// Chase suspended
    Paused,
    /// Fox reached the foxhole
    Win,
    /// Fox was caught or missed the foxhole
    Lose,
}

impl GamePhase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Win | GamePhase::Lose)
    }
}

/// Title menu pages, browsed with left/right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TitleScreen {
    #[default]
    Welcome,
    Story,
    Controls,
    Credits,
}

impl TitleScreen {
    pub fn previous(self) -> Self {
        match self {
            TitleScreen::Welcome | TitleScreen::Story => TitleScreen::Welcome,
            TitleScreen::Controls => TitleScreen::Story,
            TitleScreen::Credits => TitleScreen::Controls,
        }
    }

    pub fn next(self) -> Self {
        match self {
            TitleScreen::Welcome => TitleScreen::Story,
            TitleScreen::Story => TitleScreen::Controls,
            TitleScreen::Controls | TitleScreen::Credits => TitleScreen::Credits,
        }
    }
}

/// Ticks spent fading each way
pub const FADE_TICKS: u32 = 350;
/// Tint at full black
pub const FADE_MAX_TINT: f32 = 0.35;

/// Crossfade stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadeStage {
    /// Still showing the chase, darkening
    ToBlack,
    /// Showing the result screen, brightening
    FromBlack,
    /// Fade complete
    Done,
}

/// What a crossfade step crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeEvent {
    ReachedBlack,
    Finished,
}

/// Tick-counted fade to black and back
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crossfade {
    pub stage: FadeStage,
    /// Ticks elapsed in the current stage
    pub ticks: u32,
}

impl Default for Crossfade {
    fn default() -> Self {
        Self::new()
    }
}

impl Crossfade {
    pub fn new() -> Self {
        Self {
            stage: FadeStage::ToBlack,
            ticks: 0,
        }
    }

    /// Fraction of the current stage completed
    pub fn progress(&self) -> f32 {
        (self.ticks as f32 / FADE_TICKS as f32).min(1.0)
    }

    /// Screen tint: 0 is clear, `FADE_MAX_TINT` is black
    pub fn tint(&self) -> f32 {
        match self.stage {
            FadeStage::ToBlack => FADE_MAX_TINT * self.progress(),
            FadeStage::FromBlack => FADE_MAX_TINT * (1.0 - self.progress()),
            FadeStage::Done => 0.0,
        }
    }

    /// True once the screen has gone black (result screen is showing)
    pub fn past_black(&self) -> bool {
        self.stage != FadeStage::ToBlack
    }

    pub fn step(&mut self) -> Option<FadeEvent> {
        match self.stage {
            FadeStage::ToBlack => {
                self.ticks += 1;
                if self.ticks >= FADE_TICKS {
                    self.stage = FadeStage::FromBlack;
                    self.ticks = 0;
                    return Some(FadeEvent::ReachedBlack);
                }
                None
            }
            FadeStage::FromBlack => {
                self.ticks += 1;
                if self.ticks >= FADE_TICKS {
                    self.stage = FadeStage::Done;
                    self.ticks = 0;
                    return Some(FadeEvent::Finished);
                }
                None
            }
            FadeStage::Done => None,
        }
    }
}

/// Asset loading progress reported by the platform shell
#[derive(Debug, Default)]
pub struct AssetProgress {
    remaining: u32,
    failure: Option<String>,
}

impl AssetProgress {
    pub fn new(expected: u32) -> Self {
        Self {
            remaining: expected,
            failure: None,
        }
    }

    pub fn loaded(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn fail(&mut self, error: &GameError) {
        self.failure = Some(error.to_string());
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Ready to leave Loading
    pub fn is_complete(&self) -> bool {
        self.remaining == 0 && self.failure.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossfade_is_monotonic_and_bounded() {
        let mut fade = Crossfade::new();
        let mut last = fade.tint();
        let mut events = Vec::new();
        let mut ticks = 0;
        while fade.stage == FadeStage::ToBlack {
            if let Some(e) = fade.step() {
                events.push(e);
            } else {
                assert!(fade.tint() >= last);
                last = fade.tint();
            }
            ticks += 1;
        }
        assert_eq!(ticks, FADE_TICKS);
        assert_eq!(events, vec![FadeEvent::ReachedBlack]);
        assert!((fade.tint() - FADE_MAX_TINT).abs() < 1e-6);

        let mut last = fade.tint();
        while fade.stage == FadeStage::FromBlack {
            fade.step();
            assert!(fade.tint() <= last);
            last = fade.tint();
        }
        assert_eq!(fade.stage, FadeStage::Done);
        assert_eq!(fade.tint(), 0.0);
        assert_eq!(fade.step(), None);
    }

    #[test]
    fn test_title_navigation_clamps() {
        assert_eq!(TitleScreen::Welcome.previous(), TitleScreen::Welcome);
        assert_eq!(TitleScreen::Welcome.next(), TitleScreen::Story);
        assert_eq!(TitleScreen::Credits.next(), TitleScreen::Credits);
        assert_eq!(TitleScreen::Credits.previous(), TitleScreen::Controls);
    }

    #[test]
    fn test_asset_progress() {
        let mut progress = AssetProgress::new(2);
        assert!(!progress.is_complete());
        progress.loaded();
        progress.loaded();
        progress.loaded();
        assert!(progress.is_complete());

        progress.fail(&GameError::ShaderInit("link error".into()));
        assert!(!progress.is_complete());
        assert!(progress.failure().is_some_and(|f| f.contains("link error")));
    }
}
