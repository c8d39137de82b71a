use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors from reading a viewer config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Presentation settings for the viewer. Colors are `0xRRGGBB` sRGB.
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub palette: PaletteConfig,
    pub lighting: LightingConfig,
    pub grid: GridConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Population Peaks".into(),
            width: 1280,
            height: 720,
            background: 0xface8d,
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Visible world height at zoom 1.
    pub frustum_size: f32,
    pub near: f32,
    pub far: f32,
    /// Start position is `normalize(direction) * distance` from the origin.
    pub direction: [f32; 3],
    pub distance: f32,
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            frustum_size: 13.0,
            near: 1.0,
            far: 1000.0,
            direction: [-1.0, 1.0, 0.75],
            distance: 12.0,
            target: [0.0, 2.5, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_zoom: 0.1,
            max_zoom: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub gradient_start: u32,
    pub gradient_end: u32,
    pub outline: u32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            gradient_start: 0xffc0cb,
            gradient_end: 0xffa500,
            outline: 0xff0088,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_intensity: f32,
    pub directional_intensity: f32,
    pub directional_position: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.75,
            directional_intensity: 0.25,
            directional_position: [3.0, 5.0, 8.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub size: f32,
    pub divisions: u32,
    pub color: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 10.0,
            divisions: 10,
            color: 0x800000,
        }
    }
}

impl ViewerConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_yaml_str(&std::fs::read_to_string(path)?)?;
        tracing::info!(path = %path.display(), "viewer config loaded");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(ViewerConfig::from_yaml_str("").unwrap(), ViewerConfig::default());
        assert_eq!(ViewerConfig::from_yaml_str("{}").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = "camera:\n  frustum_size: 20.0\npalette:\n  outline: 65280\n";
        let config = ViewerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.camera.frustum_size, 20.0);
        assert_eq!(config.camera.near, 1.0);
        assert_eq!(config.palette.outline, 0x00ff00);
        assert_eq!(config.palette.gradient_start, 0xffc0cb);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn yaml_round_trip() {
        let mut config = ViewerConfig::default();
        config.window.fullscreen = true;
        config.grid.divisions = 4;
        let yaml = config.to_yaml().unwrap();
        assert_eq!(ViewerConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = ViewerConfig::from_yaml_str("grid:\n  divisions: many\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "window:\n  title: Peaks\n  width: 800").unwrap();
        let config = ViewerConfig::load(tmp.path()).unwrap();
        assert_eq!(config.window.title, "Peaks");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ViewerConfig::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn bundled_sample_config_parses() {
        let config = ViewerConfig::from_yaml_str(include_str!("../../../data/viewer.yaml")).unwrap();
        assert_eq!(config.window.title, "Population Peaks");
        assert_eq!(config.grid.divisions, 10);
    }
}
