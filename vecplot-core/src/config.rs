/// Per-request plot configuration
///
/// Front ends build a fresh [`PlotConfig`] from their controls and hand it to
/// [`crate::pipeline::plot`] once per request. Presets can be kept in TOML.
use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transform::Transform;

/// Slider range of every translation component
pub const TRANSLATION_RANGE: (f64, f64) = (-10.0, 10.0);
/// Slider range of the per-mesh scale
pub const SCALE_RANGE: (f64, f64) = (0.1, 3.0);
/// Placeholder masses used for the center of mass
pub const DEFAULT_MASSES: [f64; 2] = [1.0, 1.0];

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Translation and scale controls of one mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshControls {
    pub translation: [f64; 3],
    pub scale: f64,
}

impl MeshControls {
    pub fn transform(&self) -> Transform {
        Transform::new(self.scale, Vector3::from(self.translation))
    }
}

impl Default for MeshControls {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            scale: 1.0,
        }
    }
}

/// Which overlays to draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayToggles {
    pub resultant: bool,
    pub difference: bool,
    pub cross_product: bool,
    pub center_of_mass: bool,
}

impl OverlayToggles {
    pub fn all() -> Self {
        Self {
            resultant: true,
            difference: true,
            cross_product: true,
            center_of_mass: true,
        }
    }
}

/// Everything one plot request depends on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub mesh1: MeshControls,
    pub mesh2: MeshControls,
    pub overlays: OverlayToggles,
    pub masses: [f64; 2],
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            mesh1: MeshControls::default(),
            mesh2: MeshControls::default(),
            overlays: OverlayToggles::default(),
            masses: DEFAULT_MASSES,
        }
    }
}

fn clamp(value: f64, (min, max): (f64, f64)) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

fn check(field: &str, value: f64, (min, max): (f64, f64)) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        })
    }
}

impl PlotConfig {
    /// Copy with every slider value pulled into its range
    pub fn clamped(&self) -> Self {
        let clamp_mesh = |controls: &MeshControls| MeshControls {
            translation: controls.translation.map(|t| clamp(t, TRANSLATION_RANGE)),
            scale: clamp(controls.scale, SCALE_RANGE),
        };

        Self {
            mesh1: clamp_mesh(&self.mesh1),
            mesh2: clamp_mesh(&self.mesh2),
            ..*self
        }
    }

    /// Report the first slider value outside its range
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (label, controls) in [("mesh1", &self.mesh1), ("mesh2", &self.mesh2)] {
            for (axis, value) in ["x", "y", "z"].iter().zip(controls.translation) {
                check(&format!("{}.translation.{}", label, axis), value, TRANSLATION_RANGE)?;
            }
            check(&format!("{}.scale", label), controls.scale, SCALE_RANGE)?;
        }
        Ok(())
    }

    /// Load a preset. Values are validated, not clamped.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        ensure_toml(path)?;
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        ensure_toml(path)?;
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn ensure_toml(path: &Path) -> Result<(), ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Ok(()),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = PlotConfig::default();
        assert_eq!(config.mesh1.scale, 1.0);
        assert_eq!(config.mesh2.translation, [0.0; 3]);
        assert_eq!(config.overlays, OverlayToggles::default());
        assert_eq!(config.masses, [1.0, 1.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_clamped() {
        let mut config = PlotConfig::default();
        config.mesh1.translation = [-12.0, 4.0, 10.5];
        config.mesh2.scale = 0.0;
        config.mesh1.scale = f64::NAN;

        let clamped = config.clamped();
        assert_eq!(clamped.mesh1.translation, [-10.0, 4.0, 10.0]);
        assert_eq!(clamped.mesh1.scale, 0.1);
        assert_eq!(clamped.mesh2.scale, 0.1);
        assert!(clamped.validate().is_ok());
    }

    #[test]
    fn test_validate_names_field() {
        let mut config = PlotConfig::default();
        config.mesh2.translation[1] = 11.0;
        match config.validate() {
            Err(ConfigError::OutOfRange { field, value, .. }) => {
                assert_eq!(field, "mesh2.translation.y");
                assert_eq!(value, 11.0);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_each_mesh_uses_its_own_scale() {
        let mut config = PlotConfig::default();
        config.mesh1.scale = 2.0;
        config.mesh2.scale = 0.5;
        assert_relative_eq!(config.mesh1.transform().scale, 2.0);
        assert_relative_eq!(config.mesh2.transform().scale, 0.5);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PlotConfig::from_toml(
            r#"
            [mesh1]
            translation = [1.0, -2.0, 3.0]

            [overlays]
            cross_product = true
            "#,
        )
        .unwrap();

        assert_eq!(config.mesh1.translation, [1.0, -2.0, 3.0]);
        assert_eq!(config.mesh1.scale, 1.0);
        assert!(config.overlays.cross_product);
        assert!(!config.overlays.resultant);
        assert_eq!(config.masses, DEFAULT_MASSES);
    }

    #[test]
    fn test_save_and_load_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.toml");

        let mut config = PlotConfig::default();
        config.mesh2.translation = [0.5, 0.0, -9.5];
        config.overlays = OverlayToggles::all();
        config.save_to_file(&path).unwrap();

        assert_eq!(PlotConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_bundled_preset_is_valid() {
        let config = PlotConfig::from_toml(include_str!("../../assets/preset.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.overlays, OverlayToggles::all());
        assert_eq!(config.mesh2.scale, 2.0);
    }

    #[test]
    fn test_rejects_other_formats() {
        let err = PlotConfig::load_from_file("preset.ron").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_out_of_range_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.toml");
        std::fs::write(&path, "[mesh1]\nscale = 5.0\n").unwrap();
        assert!(matches!(
            PlotConfig::load_from_file(&path),
            Err(ConfigError::OutOfRange { .. })
        ));
    }
}
