//! Errors surfaced to the collaborator layer
//!
//! The simulation itself never fails; these cover fatal start-up problems
//! reported by the graphics/audio shells and bad settings documents.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// No usable graphics context (fatal, the game never leaves Loading)
    #[error("graphics initialization failed: {0}")]
    GraphicsInit(String),
    /// Shader program failed to compile or link
    #[error("shader program not properly initialized: {0}")]
    ShaderInit(String),
    /// A texture or sound sample could not be loaded
    #[error("asset `{name}` failed to load: {reason}")]
    AssetLoad { name: String, reason: String },
    /// Settings document could not be parsed
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
    /// Reading or writing a file failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GameResult<T> = Result<T, GameError>;
