use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

pub const CONFIG_ENV: &str = "STUDY_PLANNER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "planner.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub log_level: Option<String>,
    pub server: ServerConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            static_dir: PathBuf::from("static"),
        }
    }
}

// Where the two schedule documents live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub gk_file: String,
    pub maths_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            gk_file: "gk_data.json".to_string(),
            maths_file: "maths_data.json".to_string(),
        }
    }
}

impl DataConfig {
    pub fn gk_path(&self) -> PathBuf {
        self.dir.join(&self.gk_file)
    }

    pub fn maths_path(&self) -> PathBuf {
        self.dir.join(&self.maths_file)
    }
}

impl PlannerConfig {
    /// Load from `$STUDY_PLANNER_CONFIG`, else `planner.toml`; defaults if the file is absent.
    pub fn load() -> Result<Self> {
        let path = env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| PlannerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| PlannerError::Config(e.to_string()))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = PlannerConfig::default();
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:3000");
        assert_eq!(cfg.data.gk_path(), PathBuf::from("data/gk_data.json"));
        assert_eq!(cfg.data.maths_path(), PathBuf::from("data/maths_data.json"));
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = PlannerConfig::from_toml(
            r#"
            log_level = "debug"

            [data]
            dir = "/srv/study"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.data.gk_path(), PathBuf::from("/srv/study/gk_data.json"));
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn test_invalid_toml() {
        let err = PlannerConfig::from_toml("[server\nbind_addr = 1").unwrap_err();
        assert!(matches!(err, PlannerError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_default() {
        let cfg = PlannerConfig::load_from(Path::new("definitely/not/here.toml")).unwrap();
        assert_eq!(cfg.data.gk_file, "gk_data.json");
    }
}
