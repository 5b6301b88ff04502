//! Errors raised at the fallible edges of the game: reading settings and
//! level catalogs from disk.  Nothing inside the per-frame simulation
//! returns these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Level catalog is empty")]
    EmptyCatalog,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid level {index}: {reason}")]
    InvalidLevel { index: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, GameError>;

impl From<toml::de::Error> for GameError {
    fn from(err: toml::de::Error) -> Self {
        GameError::TomlParse(err.to_string())
    }
}
