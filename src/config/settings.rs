use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_CONF_PATH: &str = "/etc/modprobe.d/hid_apple.conf";

pub const DEFAULT_RELOAD_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Where the hid_apple module options live.
    #[serde(default = "default_conf_path")]
    pub conf_path: PathBuf,
    /// Pause between unloading and reloading the module.
    #[serde(default = "default_reload_delay")]
    pub reload_delay_ms: u64,
    /// Rebuild the initramfs without prompting (non-interactive use).
    #[serde(default)]
    pub assume_yes: bool,
}

fn default_conf_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONF_PATH)
}

fn default_reload_delay() -> u64 {
    DEFAULT_RELOAD_DELAY_MS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            conf_path: default_conf_path(),
            reload_delay_ms: DEFAULT_RELOAD_DELAY_MS,
            assume_yes: false,
        }
    }
}

/// Returns the path to ~/.fnswitch/
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".fnswitch")
}

/// Returns the path to ~/.fnswitch/config.json
pub fn config_file() -> PathBuf {
    config_dir().join("config.json")
}

pub fn load_config() -> AppConfig {
    let dir = config_dir();
    let file = config_file();

    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }

    if !file.exists() {
        let config = AppConfig::default();
        let _ = save_config(&config);
        return config;
    }

    match fs::read_to_string(&file) {
        Ok(raw) => serde_json::from_str::<AppConfig>(&raw).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    let dir = config_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(config_file(), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn with_temp_config<F: FnOnce(PathBuf)>(f: F) {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.json");
        f(config_path);
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = AppConfig::default();
        assert_eq!(config.conf_path, PathBuf::from("/etc/modprobe.d/hid_apple.conf"));
        assert_eq!(config.reload_delay_ms, 1000);
        assert!(!config.assume_yes);
    }

    #[test]
    fn config_serialization_round_trip() {
        let config = AppConfig {
            conf_path: PathBuf::from("/tmp/hid.conf"),
            reload_delay_ms: 250,
            assume_yes: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("confPath"));
        let deserialized: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.conf_path, PathBuf::from("/tmp/hid.conf"));
        assert_eq!(deserialized.reload_delay_ms, 250);
        assert!(deserialized.assume_yes);
    }

    #[test]
    fn config_deserializes_with_missing_fields() {
        let json = r#"{"assumeYes": true}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert!(config.assume_yes);
        assert_eq!(config.conf_path, PathBuf::from("/etc/modprobe.d/hid_apple.conf"));
        assert_eq!(config.reload_delay_ms, 1000);
    }

    #[test]
    fn save_and_load_config_file() {
        with_temp_config(|path| {
            let config = AppConfig {
                reload_delay_ms: 500,
                ..AppConfig::default()
            };
            let json = serde_json::to_string_pretty(&config).unwrap();
            fs::write(&path, &json).unwrap();

            let raw = fs::read_to_string(&path).unwrap();
            let loaded: AppConfig = serde_json::from_str(&raw).unwrap();
            assert_eq!(loaded.reload_delay_ms, 500);
        });
    }
}
