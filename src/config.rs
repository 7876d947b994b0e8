//! # Configuration
//!
//! Runtime settings read from a JSON file. Every field has a default, so a
//! missing file or a partial file is fine. Capacities of the element store and
//! the draw buckets are compile-time constants and are not configurable.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

use crate::{
    engine_state::rendering::meshing::MAX_PLANE_QUADS_PER_SIDE,
    error::{EngineError, EngineResult},
};

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "assets/config.json";

/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "SANDBOX_CONFIG";

/// Settings for one run of the sandbox.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path of the WGSL shader used for the UI quads
    pub ui_shader_path: PathBuf,
    /// Path of the WGSL shader used for the ground plane
    pub plane_shader_path: PathBuf,
    /// Color the frame is cleared to before anything is drawn (RGBA)
    pub clear_color: [f32; 4],
    /// Number of quads along one side of the ground plane, `1..=MAX_PLANE_QUADS_PER_SIDE`
    pub plane_quads_per_side: u32,
    /// Title of the window
    pub window_title: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ui_shader_path: PathBuf::from("assets/shaders/ui.wgsl"),
            plane_shader_path: PathBuf::from("assets/shaders/plane.wgsl"),
            clear_color: [0.1, 0.1, 0.12, 1.0],
            plane_quads_per_side: 64,
            window_title: String::from("touch-sandbox"),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> EngineResult<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| EngineError::Config(e.to_string()))?;
        if config.plane_quads_per_side == 0 {
            return Err(EngineError::Config(String::from(
                "plane_quads_per_side must be at least 1",
            )));
        }
        if config.plane_quads_per_side > MAX_PLANE_QUADS_PER_SIDE {
            return Err(EngineError::Config(format!(
                "plane_quads_per_side must be at most {}, got {}",
                MAX_PLANE_QUADS_PER_SIDE, config.plane_quads_per_side
            )));
        }
        Ok(config)
    }

    /// Reads a configuration file.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Loads the configuration from `SANDBOX_CONFIG` or the default path.
    ///
    /// A missing file yields the defaults. An unreadable or invalid file also
    /// yields the defaults, with a warning.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                warn!("{}; falling back to defaults", err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "plane_quads_per_side": 8 }"#).unwrap();
        assert_eq!(config.plane_quads_per_side, 8);
        assert_eq!(config.clear_color, EngineConfig::default().clear_color);
        assert_eq!(config.ui_shader_path, PathBuf::from("assets/shaders/ui.wgsl"));
    }

    #[test]
    fn test_zero_side_count_is_rejected() {
        let result = EngineConfig::from_json(r#"{ "plane_quads_per_side": 0 }"#);
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_oversized_side_count_is_rejected() {
        for side_count in [MAX_PLANE_QUADS_PER_SIDE + 1, 2000, 70000] {
            let json = format!(r#"{{ "plane_quads_per_side": {} }}"#, side_count);
            let result = EngineConfig::from_json(&json);
            assert!(matches!(result, Err(EngineError::Config(_))));
        }

        let json = format!(
            r#"{{ "plane_quads_per_side": {} }}"#,
            MAX_PLANE_QUADS_PER_SIDE
        );
        let config = EngineConfig::from_json(&json).unwrap();
        assert_eq!(config.plane_quads_per_side, MAX_PLANE_QUADS_PER_SIDE);
    }

    #[test]
    fn test_malformed_json_is_a_config_error() {
        let result = EngineConfig::from_json("{ clear_color: ");
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let result = EngineConfig::from_file(Path::new("definitely/not/here.json"));
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}
