//! Render modes and the catalog exposed to the control panel

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};

/// One of the four mutually exclusive physics-and-rendering behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// RGB channels offset along velocity, summed additively
    #[default]
    Spectral,
    /// Fade-instead-of-clear light trails
    Temporal,
    /// Per-frame positional jitter
    Quantum,
    /// Edge adhesion plus neighbor mesh
    Spatial,
}

/// Catalog entry for an external control surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

impl Mode {
    /// All modes in catalog order
    pub const ALL: [Mode; 4] = [Mode::Spectral, Mode::Temporal, Mode::Quantum, Mode::Spatial];

    pub fn id(&self) -> &'static str {
        match self {
            Mode::Spectral => "spectral",
            Mode::Temporal => "temporal",
            Mode::Quantum => "quantum",
            Mode::Spatial => "spatial",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Spectral => "Spectral Dispersion",
            Mode::Temporal => "Temporal Integration",
            Mode::Quantum => "Quantum Noise",
            Mode::Spatial => "Spatial Mapping (LiDAR)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Mode::Spectral => {
                "Visualizes lateral chromatic aberration relative to motion velocity, \
                 inspired by wavelength-dependent refraction."
            }
            Mode::Temporal => {
                "Simulates sensor accumulation buffers, visualizing light trails \
                 analogous to long-exposure photography."
            }
            Mode::Quantum => {
                "Visualizes perceptual shot noise via stochastic perturbation, \
                 approximating low-light signal degradation."
            }
            Mode::Spatial => "Reconstructs a sparse spatial mesh inspired by ToF depth scanning.",
        }
    }

    /// Parse a mode id (case-insensitive)
    pub fn from_id(id: &str) -> Result<Self> {
        match id.trim().to_lowercase().as_str() {
            "spectral" => Ok(Mode::Spectral),
            "temporal" => Ok(Mode::Temporal),
            "quantum" => Ok(Mode::Quantum),
            "spatial" => Ok(Mode::Spatial),
            _ => Err(LabError::UnknownMode(id.to_string())),
        }
    }

    pub fn info(&self) -> ModeInfo {
        ModeInfo {
            id: self.id(),
            name: self.name(),
            description: self.description(),
        }
    }
}

/// Id/name/description of every mode, in display order
pub fn mode_catalog() -> Vec<ModeInfo> {
    Mode::ALL.iter().map(Mode::info).collect()
}

/// Catalog as JSON, for hosts that cannot consume Rust types
pub fn mode_catalog_json() -> Result<String> {
    Ok(serde_json::to_string(&mode_catalog())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_roundtrips_every_mode() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_id(mode.id()).unwrap(), mode);
        }
        assert_eq!(Mode::from_id("  SPATIAL ").unwrap(), Mode::Spatial);
    }

    #[test]
    fn test_unknown_mode_is_an_error() {
        let err = Mode::from_id("infrared").unwrap_err();
        assert!(matches!(err, LabError::UnknownMode(ref id) if id == "infrared"));
    }

    #[test]
    fn test_catalog_json() {
        let catalog = mode_catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog[0].id, "spectral");

        let json = mode_catalog_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[3]["id"], "spatial");
        assert_eq!(parsed[3]["name"], "Spatial Mapping (LiDAR)");
    }
}
