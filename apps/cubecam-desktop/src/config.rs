use anyhow::{Context, Result};
use cubecam_camera::{Eulers, Projection};
use cubecam_input::ControlSettings;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "cubecam".into(),
        }
    }
}

/// Initial camera pose. When `target` is set the camera starts by looking at
/// it, overriding `eulers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: Vec3,
    pub eulers: Eulers,
    pub target: Option<Vec3>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            eulers: Eulers::new(0.0, 0.0, -90.0),
            target: None,
        }
    }
}

/// Everything the viewer reads from its YAML settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub controls: ControlSettings,
    pub projection: Projection,
}

impl Settings {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("invalid settings YAML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let s = Settings::from_yaml("{}").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.window.width, 800);
        assert_eq!(s.window.height, 600);
        assert_eq!(s.projection.near, 0.1);
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let yaml = r#"
camera:
  position: [1.0, 2.0, 3.0]
  eulers:
    yaw: 45.0
controls:
  sensitivity: 0.25
"#;
        let s = Settings::from_yaml(yaml).unwrap();
        assert_eq!(s.camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(s.camera.eulers, Eulers::new(0.0, 0.0, 45.0));
        assert_eq!(s.camera.target, None);
        assert_eq!(s.controls.sensitivity, 0.25);
        assert_eq!(s.controls.speed, 2.5);
    }

    #[test]
    fn target_is_parsed() {
        let s = Settings::from_yaml("camera:\n  target: [0.0, 0.0, 0.0]\n").unwrap();
        assert_eq!(s.camera.target, Some(Vec3::ZERO));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(Settings::from_yaml("window: [1, 2").is_err());
        assert!(Settings::from_yaml("window:\n  width: wide\n").is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cubecam.yaml");
        std::fs::write(&path, "window:\n  title: test\n").unwrap();
        let s = Settings::load(&path).unwrap();
        assert_eq!(s.window.title, "test");

        let missing = dir.path().join("missing.yaml");
        assert!(Settings::load(&missing).is_err());
    }
}
