use std::path::Path;

use abscomp_core::config::ConfigManager;

pub struct Config;

impl Config {
    pub fn execute(config_path: Option<&Path>) -> anyhow::Result<()> {
        let loaded = ConfigManager::load(config_path)?;

        let rendered = loaded.config.to_redacted_toml()?;

        println!("# {}", loaded.path.display());
        print!("{rendered}");

        Ok(())
    }
}
