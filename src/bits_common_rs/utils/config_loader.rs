use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::bits_common_rs::packet::decoder::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig { pub max_depth: usize }
impl Default for DecoderConfig { fn default() -> Self { Self { max_depth: DEFAULT_MAX_DEPTH } } }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig { pub level: String }
impl Default for LogConfig { fn default() -> Self { Self { level: "warn".into() } } }

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitsConfig {
    pub decoder: DecoderConfig,
    pub logging: LogConfig,
}

pub struct ConfigLoader { config_paths: Vec<PathBuf>, env_prefix: String }
impl ConfigLoader {
    pub fn new() -> Self { Self { config_paths: vec![PathBuf::from("bits.config.toml"), PathBuf::from("bits.config.json"), PathBuf::from("config.toml"), PathBuf::from("config.json")], env_prefix: "BITS_".into() } }
    pub fn with_paths(paths: Vec<PathBuf>) -> Self { Self { config_paths: paths, env_prefix: "BITS_".into() } }
    pub fn with_env_prefix(mut self, prefix: String) -> Self { self.env_prefix = prefix; self }

    /// 最初に見つかった設定ファイルを読み、環境変数で上書きして検証する
    pub fn load(&self) -> Result<BitsConfig, String> {
        let mut config = BitsConfig::default();
        for path in &self.config_paths {
            if path.exists() {
                match self.load_from_file(path) {
                    Ok(fc) => { config = fc; break; }
                    Err(e) => { log::warn!("Failed to load config from {:?}: {}", path, e); }
                }
            }
        }
        config = self.apply_env_overrides(config)?;
        self.validate_config(&config)?;
        Ok(config)
    }

    pub fn load_from_file(&self, path: &Path) -> Result<BitsConfig, String> {
        let content = fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| format!("Failed to parse JSON config: {}", e)),
            Some("toml") => toml::from_str(&content).map_err(|e| format!("Failed to parse TOML config: {}", e)),
            _ => Err("Unsupported config file format".into()),
        }
    }

    fn apply_env_overrides(&self, mut config: BitsConfig) -> Result<BitsConfig, String> {
        if let Ok(depth_str) = env::var(format!("{}MAX_DEPTH", self.env_prefix)) { config.decoder.max_depth = depth_str.parse().map_err(|_| "Invalid max depth in environment variable")?; }
        if let Ok(level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) { config.logging.level = level; }
        Ok(config)
    }

    pub fn validate_config(&self, config: &BitsConfig) -> Result<(), String> {
        if config.decoder.max_depth == 0 { return Err("Decoder max depth must be greater than 0".into()); }
        match config.logging.level.to_lowercase().as_str() { "trace"|"debug"|"info"|"warn"|"error" => {}, _ => return Err("Invalid log level. Must be one of: trace, debug, info, warn, error".into()) }
        Ok(())
    }

    pub fn save_config(&self, config: &BitsConfig, path: &Path) -> Result<(), String> {
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(config).map_err(|e| format!("Failed to serialize config to JSON: {}", e))?,
            Some("toml") => toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config to TOML: {}", e))?,
            _ => return Err("Unsupported config file format for saving".into()),
        };
        fs::write(path, content).map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }
}

impl Default for ConfigLoader { fn default() -> Self { Self::new() } }
