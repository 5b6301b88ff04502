pub mod audio;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod levels;
pub mod pool;
pub mod scene;
pub mod session;
pub mod spawner;

pub use error::{GameError, Result};
