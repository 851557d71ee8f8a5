use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::registration::WizardSettings;
use crate::testimonials::Testimonial;
use crate::validation::ContactPolicy;

const APP_DIR: &str = "enroll-desk";
const LOCAL_CONFIG: &str = "enroll-desk.yaml";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub center: CenterConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    #[serde(default)]
    pub callback: CallbackConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// YAML course catalog replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
    /// Testimonials replacing the built-in ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonials: Option<Vec<Testimonial>>,
}

/// Header banner text
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CenterConfig {
    pub name: String,
    pub tagline: String,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            name: "Training Center".to_string(),
            tagline: "Learn the skills of tomorrow, today".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct WizardConfig {
    pub auto_close_ms: u64,
    /// Check email/phone format, not just presence
    pub strict_contact: bool,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            auto_close_ms: 3000,
            strict_contact: false,
        }
    }
}

impl WizardConfig {
    pub fn settings(&self) -> WizardSettings {
        WizardSettings {
            auto_close: Duration::from_millis(self.auto_close_ms),
            policy: ContactPolicy::from_strict(self.strict_contact),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CallbackConfig {
    pub auto_close_ms: u64,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self { auto_close_ms: 2000 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CarouselConfig {
    pub interval_ms: u64, // 0 = no auto-advance
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self { interval_ms: 4000 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    #[default]
    Log,
    Outbox,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct DeliveryConfig {
    pub mode: DeliveryMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbox_path: Option<PathBuf>,
}

impl DeliveryConfig {
    pub fn outbox_path(&self) -> PathBuf {
        self.outbox_path
            .clone()
            .unwrap_or_else(|| data_dir().join("outbox.jsonl"))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| data_dir().join("enroll-desk.log"))
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn read_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: Config = serde_yaml_ng::from_str(&contents)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    // 1. Path given on the command line must exist
    if let Some(path) = explicit {
        return read_config(path);
    }

    // 2. Check local enroll-desk.yaml
    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        return read_config(local_config);
    }

    // 3. Check ~/.config/enroll-desk/config.yaml
    if let Some(config_path) = get_config_path() {
        if config_path.exists() {
            return read_config(&config_path);
        }
    }

    Ok(Config::default())
}

/// Save config to the user config directory, returning where it went
pub fn save_config(config: &Config) -> Result<PathBuf> {
    let config_path = get_config_path().context("no user config directory on this system")?;
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml_ng::to_string(config)?;
    fs::write(&config_path, yaml)?;
    Ok(config_path)
}

/// Get the config file path (for display purposes)
pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.wizard.auto_close_ms, 3000);
        assert_eq!(config.callback.auto_close_ms, 2000);
        assert_eq!(config.carousel.interval_ms, 4000);
        assert_eq!(config.delivery.mode, DeliveryMode::Log);
        assert_eq!(config.wizard.settings().policy, ContactPolicy::Presence);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
wizard:
  strict_contact: true
delivery:
  mode: outbox
  outbox_path: /tmp/enquiries.jsonl
"#;
        let config: Config = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.wizard.auto_close_ms, 3000);
        assert_eq!(config.wizard.settings().policy, ContactPolicy::Strict);
        assert_eq!(config.delivery.mode, DeliveryMode::Outbox);
        assert_eq!(
            config.delivery.outbox_path(),
            PathBuf::from("/tmp/enquiries.jsonl")
        );
        assert_eq!(config.center.name, "Training Center");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(
            &path,
            "center:\n  name: Tbilisi Academy\n  tagline: Code and create\ncarousel:\n  interval_ms: 0\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.center.name, "Tbilisi Academy");
        assert_eq!(config.carousel.interval_ms, 0);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.yaml"))).is_err());
    }

    #[test]
    fn test_yaml_roundtrip_keeps_testimonials() {
        let mut config = Config::default();
        config.testimonials = Some(crate::testimonials::builtin_testimonials());
        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let back: Config = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(back.testimonials.unwrap().len(), 4);
    }
}
