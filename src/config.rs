use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub snapshot_dir: String,
    pub output_path: String,
    #[serde(default = "default_image_width")]
    pub image_width_inches: f64,
    #[serde(default)]
    pub content_path: Option<String>,
}

fn default_image_width() -> f64 {
    6.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_dir: "snapshot".to_string(),
            output_path: "Routine_Editor_Newsletter.docx".to_string(),
            image_width_inches: default_image_width(),
            content_path: None,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = if path.as_ref().exists() {
            let content = fs::read_to_string(path)
                .context("Failed to read config file")?;
            let config: Config = serde_json::from_str(&content)
                .context("Failed to parse config file")?;
            config.validate()?;
            config
        } else {
            // Create default config
            let config = Config::default();
            config.save(path)?;
            config
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.image_width_inches.is_finite() || self.image_width_inches <= 0.0 {
            anyhow::bail!(
                "image_width_inches must be a positive number, got {}",
                self.image_width_inches
            );
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(path, content)
            .context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.snapshot_dir, "snapshot");
        assert_eq!(config.output_path, "Routine_Editor_Newsletter.docx");
        assert!((config.image_width_inches - 6.0).abs() < 1e-9);
        assert!(config.content_path.is_none());
    }

    #[test]
    fn existing_config_is_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "snapshot_dir": "/tmp/shots", "output_path": "out.docx" }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.snapshot_dir, "/tmp/shots");
        assert_eq!(config.output_path, "out.docx");
        assert!((config.image_width_inches - 6.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_image_width_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "snapshot_dir": "s", "output_path": "o.docx", "image_width_inches": 0 }"#,
        )
        .unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("image_width_inches"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
