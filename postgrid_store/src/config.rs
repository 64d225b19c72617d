use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub api_port: u16,
    /// JSON snapshot the store loads at startup and rewrites after every
    /// mutation. `None` keeps everything in memory.
    pub data_path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("POSTGRID_STORE_PORT").ok(),
            env::var("POSTGRID_STORE_DATA").ok(),
        )
    }

    fn from_vars(port: Option<String>, data: Option<String>) -> Self {
        let api_port = port
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_API_PORT);
        let data_path = data
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);
        Self {
            api_port,
            data_path,
        }
    }
}
