//! # Translation Config
//!
//! Backend settings stored as a YAML file, typically `translation_config.yaml`
//! next to the data directory.
//!
//! ```yaml
//! data_directory: "data"
//! resources_directory: "."
//! managed_locales: ["en", "fr"]
//! default_page_size: 20
//! data_format_version: "1.0"
//! ```
//!
//! Relative directories are resolved against the directory holding the file.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Where the CSV tables live
    pub data_directory: PathBuf,
    /// Root that resource file paths are stored relative to
    pub resources_directory: PathBuf,
    /// Locales offered by front ends
    pub managed_locales: Vec<String>,
    /// Page size used when a listing request does not choose one
    pub default_page_size: u32,
    /// Data format version for future migrations
    pub data_format_version: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("data"),
            resources_directory: PathBuf::from("."),
            managed_locales: vec!["en".to_string()],
            default_page_size: 20,
            data_format_version: "1.0".to_string(),
        }
    }
}

impl TranslationConfig {
    /// Load the config, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: TranslationConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save the config, replacing the file atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory {:?}", parent))?;
            }
        }

        let yaml_content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        // Use atomic write pattern: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, path)?;

        debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Copy of the config with relative directories anchored at `base`
    pub fn resolved_against(&self, base: &Path) -> Self {
        let anchor = |dir: &Path| {
            if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                base.join(dir)
            }
        };
        Self {
            data_directory: anchor(&self.data_directory),
            resources_directory: anchor(&self.resources_directory),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = TranslationConfig::load(&temp_dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, TranslationConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("translation_config.yaml");

        let config = TranslationConfig {
            managed_locales: vec!["en".to_string(), "fr".to_string()],
            default_page_size: 50,
            ..Default::default()
        };
        config.save(&path).unwrap();

        assert_eq!(TranslationConfig::load(&path).unwrap(), config);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("translation_config.yaml");
        fs::write(&path, "managed_locales: [de]\n").unwrap();

        let config = TranslationConfig::load(&path).unwrap();
        assert_eq!(config.managed_locales, vec!["de"]);
        assert_eq!(config.default_page_size, 20);
    }

    #[test]
    fn test_invalid_yaml_is_reported_with_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("translation_config.yaml");
        fs::write(&path, "default_page_size: [not, a, number]\n").unwrap();

        let error = TranslationConfig::load(&path).unwrap_err();
        assert!(error.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_relative_directories_are_anchored() {
        let config = TranslationConfig {
            resources_directory: PathBuf::from("/srv/app"),
            ..Default::default()
        };
        let resolved = config.resolved_against(Path::new("/etc/translations"));
        assert_eq!(resolved.data_directory, PathBuf::from("/etc/translations/data"));
        assert_eq!(resolved.resources_directory, PathBuf::from("/srv/app"));
    }
}
