use crate::error::{AssemblerError, Result};
use serde::Deserialize;
use std::fs;

fn default_locales() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_split_tools() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_split_tools")]
    pub split_tools: bool,
    #[serde(default)]
    pub split_glossary: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            locales: default_locales(),
            output_dir: default_output_dir(),
            split_tools: default_split_tools(),
            split_glossary: false,
        }
    }
}

impl Config {
    /// Loads `config.toml` when present; a missing file means defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.unwrap_or("config.toml");
        let config_content = match fs::read_to_string(config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && path.is_none() => {
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(AssemblerError::Config(format!(
                    "Failed to read config file '{config_path}': {e}"
                )))
            }
        };
        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}
