use config::{Config, ConfigError, File};
use serde::Deserialize;

/// Runtime configuration, read from `settings.toml` in the working directory.
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub auth: Auth,
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level applied to every crate of the workspace.
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    /// Address to bind, `127.0.0.1` when unset.
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

/// Database backing the engine.
///
/// `database = "memory"` runs on an in-memory SQLite database that vanishes
/// on shutdown; `database = { sqlite = "path/to.db" }` persists to a file,
/// creating it on first start.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    /// Secret for signing and verifying bearer tokens.
    pub jwt_secret: String,
    /// Token lifetime in days, 7 when unset.
    pub token_days: Option<i64>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("settings"))
            .build()?
            .try_deserialize()
    }
}
