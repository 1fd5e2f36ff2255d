//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - One tick per display refresh
//! - Seeded RNG only (obstacle layout is reproducible per seed)
//! - Stable iteration order (obstacles keep insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod kinematics;
pub mod obstacle;
pub mod phase;
pub mod player;
pub mod state;
pub mod streamer;
pub mod tick;

pub use collision::{CollisionReport, Contact, circle_contact, resolve_obstacles};
pub use enemy::Enemy;
pub use kinematics::{Body, Bounds};
pub use obstacle::{Obstacle, ObstacleKind};
pub use phase::{Crossfade, FadeStage, GamePhase, TitleScreen};
pub use player::{Locomotion, Player};
pub use state::{GameEvent, GameState, SoundCue};
pub use streamer::LevelStreamer;
pub use tick::tick;
