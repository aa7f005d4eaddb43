//! Lighting Lab settings
//!
//! Nothing is persisted between sessions; a host may pass settings as JSON
//! when mounting, otherwise the defaults apply.

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};
use crate::sim::Mode;

/// Upper bound on particle count (the mesh pass is O(n^2))
pub const MAX_PARTICLES: usize = 5000;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Particles in the field for this preset
    pub fn particle_count(&self) -> usize {
        match self {
            QualityPreset::Low => 50,
            QualityPreset::Medium => 100,
            QualityPreset::High => 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Overrides the preset's particle count
    pub particle_count: Option<usize>,
    /// Mode active when the engine starts
    pub initial_mode: Mode,
    /// Delay before reseeding once the page layout has settled
    pub settle_delay_ms: u32,
    /// RNG seed; the host picks one from the clock when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particle_count: None,
            initial_mode: Mode::Spectral,
            settle_delay_ms: 500,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let count = self.particle_count();
        if count == 0 {
            return Err(LabError::InvalidSettings("particle count must be positive".into()));
        }
        if count > MAX_PARTICLES {
            return Err(LabError::InvalidSettings(format!(
                "particle count {} exceeds {}",
                count, MAX_PARTICLES
            )));
        }
        Ok(())
    }

    /// Effective particle count
    pub fn particle_count(&self) -> usize {
        self.particle_count
            .unwrap_or_else(|| self.quality.particle_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_canonical() {
        let settings = Settings::default();
        assert_eq!(settings.particle_count(), 100);
        assert_eq!(settings.initial_mode, Mode::Spectral);
        assert_eq!(settings.settle_delay_ms, 500);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let settings = Settings::from_json(r#"{"quality":"high","initial_mode":"spatial"}"#).unwrap();
        assert_eq!(settings.particle_count(), 200);
        assert_eq!(settings.initial_mode, Mode::Spatial);
        assert_eq!(settings.settle_delay_ms, 500);

        let settings = Settings::from_json(r#"{"particle_count":12,"seed":7}"#).unwrap();
        assert_eq!(settings.particle_count(), 12);
        assert_eq!(settings.seed, Some(7));
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{"particle_count":0}"#),
            Err(LabError::InvalidSettings(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"particle_count":100000}"#),
            Err(LabError::InvalidSettings(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"initial_mode":"xray"}"#),
            Err(LabError::Json(_))
        ));
    }

    #[test]
    fn test_override_beats_preset() {
        let settings = Settings {
            quality: QualityPreset::Low,
            ..Settings::default()
        };
        assert_eq!(settings.particle_count(), 50);

        let settings = Settings {
            quality: QualityPreset::High,
            particle_count: Some(75),
            ..Settings::default()
        };
        assert_eq!(settings.particle_count(), 75);
    }
}
