use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::SurfaceGeometry;

/// Roughly 30 frames per second.
pub const DEFAULT_FRAME_BUDGET_MS: u64 = 33;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub geometry: SurfaceGeometry,
    #[serde(default = "default_frame_budget_ms")]
    pub frame_budget_ms: u64,
    /// Where `tracing` output goes. Logging is off when unset, since the
    /// terminal itself belongs to the engine.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_frame_budget_ms() -> u64 {
    DEFAULT_FRAME_BUDGET_MS
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            geometry: SurfaceGeometry::default(),
            frame_budget_ms: default_frame_budget_ms(),
            log_file: None,
        }
    }
}

impl EngineConfig {
    /// Load the user config, falling back to defaults if it is missing or
    /// unusable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::from_path(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: invalid engine config ({e}), using defaults");
                Self::default()
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EngineConfig =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_budget_ms == 0 {
            return Err(ConfigError::ZeroBudget);
        }
        let SurfaceGeometry { width, height, .. } = self.geometry;
        if width < 3 || height < 3 {
            return Err(ConfigError::SurfaceTooSmall { width, height });
        }
        Ok(())
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("frameloop");
        path.push("engine.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_object_gives_defaults() {
        let file = write_config("{}");
        assert_eq!(EngineConfig::from_path(file.path()).unwrap(), EngineConfig::default());
    }

    #[test]
    fn reads_all_fields() {
        let file = write_config(
            r#"{
                "geometry": { "width": 40, "height": 12, "x": 3, "y": 1 },
                "frame_budget_ms": 16,
                "log_file": "/tmp/frameloop.log"
            }"#,
        );
        let config = EngineConfig::from_path(file.path()).unwrap();
        assert_eq!(
            config,
            EngineConfig {
                geometry: SurfaceGeometry {
                    width: 40,
                    height: 12,
                    x: 3,
                    y: 1,
                },
                frame_budget_ms: 16,
                log_file: Some(PathBuf::from("/tmp/frameloop.log")),
            }
        );
    }

    #[test]
    fn origin_defaults_to_zero() {
        let file = write_config(r#"{ "geometry": { "width": 20, "height": 10 } }"#);
        let config = EngineConfig::from_path(file.path()).unwrap();
        assert_eq!((config.geometry.x, config.geometry.y), (0, 0));
    }

    #[test]
    fn rejects_zero_budget() {
        let file = write_config(r#"{ "frame_budget_ms": 0 }"#);
        assert!(matches!(
            EngineConfig::from_path(file.path()),
            Err(ConfigError::ZeroBudget)
        ));
    }

    #[test]
    fn rejects_tiny_surface() {
        let file = write_config(r#"{ "geometry": { "width": 2, "height": 10 } }"#);
        assert!(matches!(
            EngineConfig::from_path(file.path()),
            Err(ConfigError::SurfaceTooSmall { width: 2, height: 10 })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_config("{ not json");
        assert!(matches!(
            EngineConfig::from_path(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            EngineConfig::from_path(&path),
            Err(ConfigError::Read { .. })
        ));
    }
}
