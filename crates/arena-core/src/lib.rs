pub mod config;
pub mod error;
pub mod models;

pub use self::config::ArenaConfig;
pub use self::error::{ArenaError, Result};
pub use self::models::*;
