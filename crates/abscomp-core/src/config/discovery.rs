//! Configuration file discovery from multiple locations

use std::path::{Path, PathBuf};

/// Project config file name
pub const PROJECT_CONFIG: &str = "absconfig.toml";

/// Configuration file locations in order of precedence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFiles {
    /// Config from CLI flag (highest precedence)
    pub cli: Option<PathBuf>,
    /// `absconfig.toml` in the current or a parent directory
    pub project: Option<PathBuf>,
    /// Global XDG config
    pub global: Option<PathBuf>,
}

impl ConfigFiles {
    /// The file that wins, if any was found
    #[must_use]
    pub fn selected(&self) -> Option<&Path> {
        self.cli
            .as_deref()
            .or(self.project.as_deref())
            .or(self.global.as_deref())
    }
}

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover all available configuration files
    ///
    /// An explicit CLI path is returned as given, even if it does not exist,
    /// so the loader can report it.
    pub fn discover(cli_path: Option<&Path>) -> ConfigFiles {
        ConfigFiles {
            cli: cli_path.map(Path::to_path_buf),
            project: Self::find_file(PROJECT_CONFIG),
            global: Self::global_config_path().filter(|p| p.is_file()),
        }
    }

    /// Where the global config lives on this platform
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("abscomp").join("config.toml"))
    }

    /// Find a config file in the current directory or parent directories
    fn find_file(name: &str) -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }
}
