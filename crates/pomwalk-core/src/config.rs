use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use pomwalk_util::errors::PomwalkError;

/// Environment variable that overrides the configured local repository.
pub const LOCAL_REPO_ENV: &str = "POMWALK_LOCAL_REPO";

/// User configuration loaded from `~/.pomwalk/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PomwalkConfig {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

/// Local repository settings from `[repository]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default = "default_local_repository")]
    pub local: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            local: default_local_repository(),
        }
    }
}

fn default_local_repository() -> String {
    "~/.m2/repository".to_string()
}

/// Resolution settings from `[resolve]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Upper bound on manifest reads in flight at once.
    #[serde(default = "default_max_concurrent_reads", rename = "max-concurrent-reads")]
    pub max_concurrent_reads: usize,
    /// Expose process environment variables as `env.*` properties.
    #[serde(default = "default_environment")]
    pub environment: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            max_concurrent_reads: default_max_concurrent_reads(),
            environment: default_environment(),
        }
    }
}

fn default_max_concurrent_reads() -> usize {
    8
}

fn default_environment() -> bool {
    true
}

/// File watching settings from `[watch]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_debounce_ms", rename = "debounce-ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

impl PomwalkConfig {
    /// Load `~/.pomwalk/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from an explicit path, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| PomwalkError::Config {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| {
            PomwalkError::Config {
                message: format!("failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// The local repository root: `POMWALK_LOCAL_REPO` if set, else `[repository] local`.
    pub fn local_repository(&self) -> PathBuf {
        match std::env::var(LOCAL_REPO_ENV) {
            Ok(dir) if !dir.trim().is_empty() => pomwalk_util::fs::expand_home(dir.trim()),
            _ => pomwalk_util::fs::expand_home(&self.repository.local),
        }
    }
}

/// Returns the path to the pomwalk data directory (`~/.pomwalk/`).
pub fn dirs_path() -> PathBuf {
    pomwalk_util::fs::home_dir().join(".pomwalk")
}
