//! Tunable constants for the placement engine, loadable from TOML

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration loaded from a placement TOML file
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct PlacementConfig {
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub alignment: AlignmentConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub snap: SnapConfig,
    #[serde(default)]
    pub anchors: AnchorConfig,
}

impl PlacementConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&source)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SmoothingConfig {
    /// Number of recent distances averaged
    #[serde(default = "default_window")]
    pub window: usize,
    /// Maximum camera-to-object distance
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
}

fn default_window() -> usize {
    10
}

fn default_max_distance() -> f32 {
    10.0
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            max_distance: default_max_distance(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AlignmentConfig {
    /// Seconds spent animating a change of alignment
    #[serde(default = "default_transition_duration")]
    pub transition_duration: f32,
    /// Yaw written when turning vertical (non-zero so the write always registers)
    #[serde(default = "default_vertical_yaw_epsilon")]
    pub vertical_yaw_epsilon: f32,
}

fn default_transition_duration() -> f32 {
    0.5
}

fn default_vertical_yaw_epsilon() -> f32 {
    0.0001
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            transition_duration: default_transition_duration(),
            vertical_yaw_epsilon: default_vertical_yaw_epsilon(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RankingConfig {
    /// Max height difference for accepting an infinite horizontal plane
    #[serde(default = "default_height_tolerance")]
    pub height_tolerance: f32,
}

fn default_height_tolerance() -> f32 {
    0.05
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            height_tolerance: default_height_tolerance(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SnapConfig {
    /// Padding around the plane extent, as a fraction of the extent per side
    #[serde(default = "default_edge_tolerance")]
    pub edge_tolerance: f32,
    /// Distances at or below this count as already on the plane
    #[serde(default = "default_snap_min_distance")]
    pub min_distance: f32,
    /// Distances at or above this are left alone
    #[serde(default = "default_snap_max_distance")]
    pub max_distance: f32,
    /// Snap animation seconds per unit of distance
    #[serde(default = "default_seconds_per_unit")]
    pub seconds_per_unit: f32,
}

fn default_edge_tolerance() -> f32 {
    0.1
}

fn default_snap_min_distance() -> f32 {
    0.001
}

fn default_snap_max_distance() -> f32 {
    0.05
}

fn default_seconds_per_unit() -> f32 {
    500.0
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            edge_tolerance: default_edge_tolerance(),
            min_distance: default_snap_min_distance(),
            max_distance: default_snap_max_distance(),
            seconds_per_unit: default_seconds_per_unit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnchorConfig {
    /// Movement that forces a new anchor when placement ends
    #[serde(default = "default_refresh_distance")]
    pub refresh_distance: f32,
}

fn default_refresh_distance() -> f32 {
    0.01
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            refresh_distance: default_refresh_distance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PlacementConfig::default();
        assert_eq!(config.smoothing.window, 10);
        assert_eq!(config.smoothing.max_distance, 10.0);
        assert_eq!(config.alignment.transition_duration, 0.5);
        assert_eq!(config.alignment.vertical_yaw_epsilon, 0.0001);
        assert_eq!(config.ranking.height_tolerance, 0.05);
        assert_eq!(config.snap.seconds_per_unit, 500.0);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PlacementConfig::from_toml(
            r#"
            [smoothing]
            window = 4

            [snap]
            max_distance = 0.1
            "#,
        )
        .unwrap();

        assert_eq!(config.smoothing.window, 4);
        assert_eq!(config.smoothing.max_distance, 10.0);
        assert_eq!(config.snap.max_distance, 0.1);
        assert_eq!(config.snap.min_distance, 0.001);
        assert_eq!(config.alignment, AlignmentConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(
            PlacementConfig::from_toml("").unwrap(),
            PlacementConfig::default()
        );
    }

    #[test]
    fn test_invalid_toml() {
        let result = PlacementConfig::from_toml("[smoothing]\nwindow = \"ten\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[alignment]\ntransition_duration = 0.25").unwrap();

        let config = PlacementConfig::load(file.path()).unwrap();
        assert_eq!(config.alignment.transition_duration, 0.25);
    }

    #[test]
    fn test_load_missing_file() {
        let result = PlacementConfig::load("/nonexistent/placement.toml");
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
