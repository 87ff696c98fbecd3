use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured server URL.
const SERVER_ENV: &str = "SLIDE_TRANSLATOR_SERVER";

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the translation server, e.g. "http://localhost:5001"
    pub server_url: String,
    /// Translation service preselected in the service dropdown
    pub service: String,
    /// Output formats checked when the window opens
    pub default_formats: Vec<String>,
    /// Initial folder for the save dialog
    pub download_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5001".into(),
            service: "google".into(),
            default_formats: vec!["pptx".into()],
            download_dir: None,
        }
    }
}

impl Config {
    /// Directory: ~/.config/slide-translator/
    fn dir() -> PathBuf {
        let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("slide-translator");
        p
    }

    fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from disk, returning defaults if file doesn't exist or is invalid.
    pub fn load() -> Self {
        let mut config = Self::load_from(&Self::path());
        if let Ok(url) = std::env::var(SERVER_ENV) {
            if !url.trim().is_empty() {
                log::info!("Using server URL from {SERVER_ENV}: {url}");
                config.server_url = url.trim().to_string();
            }
        }
        config
    }

    fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                log::warn!("Ignoring invalid config at {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::path())
    }

    fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }
}
