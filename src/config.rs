// Where the inventory and credential documents live.
// Defaults match the file names the program has always used, relative to
// the working directory.

use std::path::PathBuf;

pub const INVENTORY_ENV: &str = "MAGAZZINO_INVENTORY";
pub const LOGIN_ENV: &str = "MAGAZZINO_LOGIN";
pub const DEFAULT_INVENTORY: &str = "Magazzino.json";
pub const DEFAULT_LOGIN: &str = "Login.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub inventory_path: PathBuf,
    pub credentials_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            inventory_path: PathBuf::from(DEFAULT_INVENTORY),
            credentials_path: PathBuf::from(DEFAULT_LOGIN),
        }
    }
}

impl Config {
    /// Build a config from `MAGAZZINO_INVENTORY` / `MAGAZZINO_LOGIN`,
    /// falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        Config {
            inventory_path: lookup(INVENTORY_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.inventory_path),
            credentials_path: lookup(LOGIN_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.credentials_path),
        }
    }

    /// Replace paths given explicitly on the command line.
    pub fn with_overrides(
        mut self,
        inventory: Option<PathBuf>,
        credentials: Option<PathBuf>,
    ) -> Self {
        if let Some(p) = inventory {
            self.inventory_path = p;
        }
        if let Some(p) = credentials {
            self.credentials_path = p;
        }
        self
    }
}
