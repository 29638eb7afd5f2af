//! Process configuration read from the environment.
//!
//! # Invariants
//! - Every variable has a default; only malformed values fail.
//! - The log directory, when set, is absolute.

use opencontact_core::logging::normalize_level;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "OPENCONTACT_DB_PATH";
pub const BIND_ADDR_VAR: &str = "OPENCONTACT_BIND_ADDR";
pub const LOG_LEVEL_VAR: &str = "OPENCONTACT_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "OPENCONTACT_LOG_DIR";

const DEFAULT_DB_PATH: &str = "opencontact.sqlite3";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_level: &'static str,
    /// `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Reads the process environment, after loading `.env` when present.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Blank values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = PathBuf::from(var(DB_PATH_VAR).unwrap_or_else(|| DEFAULT_DB_PATH.into()));

        let bind_raw = var(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|err| format!("{BIND_ADDR_VAR}=`{bind_raw}` is not a socket address: {err}"))?;

        let log_level = match var(LOG_LEVEL_VAR) {
            Some(level) => normalize_level(&level).map_err(|err| format!("{LOG_LEVEL_VAR}: {err}"))?,
            None => opencontact_core::default_log_level(),
        };

        let log_dir = match var(LOG_DIR_VAR) {
            Some(dir) => {
                let path = PathBuf::from(&dir);
                if !path.is_absolute() {
                    return Err(format!("{LOG_DIR_VAR} must be an absolute path, got `{dir}`"));
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_dir,
        })
    }
}
