//! The config command: show, locate, or initialize configuration.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use crate::error::{Result, SammendragError};

pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let text = toml::to_string_pretty(&settings)
                .map_err(|e| SammendragError::Config(e.to_string()))?;
            println!("{}", text);
        }
        ConfigAction::Path => {
            println!("{}", Settings::default_config_path().display());
        }
        ConfigAction::Init => {
            let path = Settings::default_config_path();
            if path.exists() {
                Output::warning(&format!("Config already exists at {}", path.display()));
            } else {
                settings.save_to(&path)?;
                Output::success(&format!("Wrote default config to {}", path.display()));
            }
        }
    }
    Ok(())
}
