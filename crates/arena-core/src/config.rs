use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct ArenaConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub store: StoreConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the judging endpoint.
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionConfig {
    /// Language a session starts in when none is given explicitly.
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    /// Persisted code file. Empty means `$ARENA_HOME/code.json`.
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

impl ArenaConfig {
    pub fn new() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.url", "http://localhost:3000")?
            .set_default("session.language", "python")?
            .set_default("store.path", "")?
            .set_default("log.level", "info")?
            // Merge arena.toml if exists
            .add_source(config::File::with_name("arena").required(false))
            // Merge environment variables (ARENA_*)
            .add_source(config::Environment::with_prefix("ARENA").separator("_"));

        builder.build()?.try_deserialize()
    }

    /// Resolve where persisted code lives.
    pub fn store_path(&self) -> PathBuf {
        if !self.store.path.is_empty() {
            return PathBuf::from(&self.store.path);
        }
        arena_home().join("code.json")
    }
}

/// `$ARENA_HOME`, falling back to `~/.arena`.
pub fn arena_home() -> PathBuf {
    if let Ok(home) = std::env::var("ARENA_HOME") {
        return PathBuf::from(home);
    }
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".arena"),
        Err(_) => {
            tracing::warn!("HOME not set, keeping arena data in the working directory");
            PathBuf::from(".arena")
        }
    }
}
