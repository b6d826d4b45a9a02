use std::path::PathBuf;

use geopal_shared::upload::DEFAULT_UPLOAD_LIMIT;

/// Server settings, read once from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub assets_dir: PathBuf,
    pub dist_dir: PathBuf,
    pub upload_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| format!("Invalid PORT {raw:?}: {e}"))?,
            None => 3000,
        };
        let upload_limit = match get("UPLOAD_LIMIT_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| format!("Invalid UPLOAD_LIMIT_BYTES {raw:?}: {e}"))?,
            None => DEFAULT_UPLOAD_LIMIT,
        };

        Ok(Config {
            port,
            assets_dir: PathBuf::from(get("ASSETS_DIR").unwrap_or_else(|| "assets".to_string())),
            dist_dir: PathBuf::from(get("DIST_DIR").unwrap_or_else(|| "dist".to_string())),
            upload_limit,
        })
    }

    pub fn index_path(&self) -> PathBuf {
        self.dist_dir.join("index.html")
    }
}
