//! Runtime settings for the sales-plan server.
//!
//! Values start from built-in defaults and can be overridden with environment
//! variables prefixed `SALES_PLANS_`, e.g. `SALES_PLANS_PORT=9000` or
//! `SALES_PLANS_DATABASE_PATH=/var/lib/plans.sqlite`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "SALES_PLANS";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_PATH: &str = "sales_plans.sqlite";
/// 10 MB, enough for a batch save of every table.
pub const DEFAULT_JSON_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// SQLite file; created with its schema on first start.
    pub database_path: String,
    pub json_limit_bytes: usize,
    /// Open the editor in the default browser once the server is up.
    pub open_browser: bool,
}

impl Settings {
    /// Defaults overridden by the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("database_path", DEFAULT_DATABASE_PATH)?
            .set_default("json_limit_bytes", DEFAULT_JSON_LIMIT as i64)?
            .set_default("open_browser", true)?
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
