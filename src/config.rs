use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CitaConfig {
    pub base_url: String,
}

impl Default for CitaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl CitaConfig {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("cita")
            .join("config.json")
    }

    /// Load the config, falling back to defaults when the file is missing
    /// or unreadable. Never fatal.
    pub fn load() -> Self {
        let path = Self::config_path();
        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("ignoring malformed config at {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_service() {
        assert_eq!(CitaConfig::default().base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = CitaConfig {
            base_url: "http://example.test:8080".to_string(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: CitaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
