//! Fox Escape - an endless-runner chase through the unilluminated forest
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (kinematics, collisions, streaming, phases)
//! - `renderer`: Camera and per-object draw commands for a sprite renderer
//! - `audio`: Sound cue dispatch to a playback backend
//! - `input`: Control map and key-up edge detection
//! - `settings`: Player preferences (volumes, mute, seed)

pub mod audio;
pub mod error;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{GameError, GameResult};
pub use settings::Settings;

/// World geometry and physics constants
pub mod consts {
    /// Gravity subtracted from vertical velocity every tick
    pub const GRAVITY: f32 = 0.00982;
    /// Lateral velocity damping per tick
    pub const FRICTION_X: f32 = 0.7;
    /// Forward velocity damping per tick
    pub const FRICTION_Z: f32 = 0.92;

    /// Depth of one generation band
    pub const BAND_DEPTH: f32 = 128.0;
    /// Candidate obstacles drawn per band
    pub const OBSTACLES_PER_BAND: usize = 32;
    /// Obstacles further than this behind the traveler are culled
    pub const CULL_MARGIN: f32 = 5.0;

    /// Lateral extent of obstacle placement
    pub const WORLD_LEFT: f32 = -8.0;
    pub const WORLD_RIGHT: f32 = 8.0;
    /// Ground level (where obstacles stand and entities run)
    pub const GROUND_Y: f32 = -1.5;
    /// Highest point an entity can reach
    pub const CEILING_Y: f32 = 1.0;
    /// Lateral clamp for entities
    pub const ENTITY_LEFT: f32 = -6.0;
    pub const ENTITY_RIGHT: f32 = 6.0;

    /// Depth of the foxhole (off any band boundary)
    pub const GOAL_DEPTH: f32 = -2048.0 - 64.0;
    /// Lateral spread of the foxhole around the center line
    pub const GOAL_SPREAD: f32 = 2.0;
    /// No obstacle is placed within this depth distance of the foxhole
    pub const GOAL_EXCLUSION: f32 = 8.0;
    /// Missing the foxhole by more than this loses the run
    pub const GOAL_OVERSHOOT: f32 = 5.0;

    /// Enemy start depth (behind the player)
    pub const ENEMY_START_Z: f32 = 32.0;
    /// Enemy catches the player within this depth distance
    pub const CATCH_MARGIN: f32 = 2.0;

    /// Real-time duration of a tumble (milliseconds)
    pub const TUMBLE_MS: f64 = 1000.0;

    /// Nominal frame time used by tools and tests (60 Hz)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
}

/// Band index for a depth: 0 for `[0, -128)`, 1 for `[-128, -256)` and so on.
///
/// Matches `ceil(z / 128)` negated, so `z = 0` is band 0.
#[inline]
pub fn band_index(z: f32) -> i32 {
    -((z / consts::BAND_DEPTH).ceil() as i32)
}

/// Positive remainder, used for the berry bob phase
#[inline]
pub fn wrap_positive(value: f32, modulus: f32) -> f32 {
    let r = value % modulus;
    if r < 0.0 { r + modulus } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_index() {
        assert_eq!(band_index(0.0), 0);
        assert_eq!(band_index(-0.5), 0);
        assert_eq!(band_index(-127.9), 0);
        assert_eq!(band_index(-128.5), 1);
        assert_eq!(band_index(-300.0), 2);
    }

    #[test]
    fn test_wrap_positive() {
        assert!((wrap_positive(-130.0, 128.0) - 126.0).abs() < 0.001);
        assert!((wrap_positive(10.0, 128.0) - 10.0).abs() < 0.001);
    }
}
