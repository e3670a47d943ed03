//! Pack configuration.
//!
//! These are the user-facing defaults consulted by the packing
//! orchestrator. They are plain values owned by the caller.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest accepted fallback resolution.
pub const MIN_DEFAULT_RESOLUTION: u32 = 256;
/// Largest accepted fallback resolution.
pub const MAX_DEFAULT_RESOLUTION: u32 = 8192;

/// Square resolution used for auto-bakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BakeResolution {
    R512,
    R1024,
    #[default]
    R2048,
    R4096,
}

impl BakeResolution {
    /// Edge length in pixels.
    pub fn pixels(&self) -> u32 {
        match self {
            BakeResolution::R512 => 512,
            BakeResolution::R1024 => 1024,
            BakeResolution::R2048 => 2048,
            BakeResolution::R4096 => 4096,
        }
    }
}

impl TryFrom<u32> for BakeResolution {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            512 => Ok(BakeResolution::R512),
            1024 => Ok(BakeResolution::R1024),
            2048 => Ok(BakeResolution::R2048),
            4096 => Ok(BakeResolution::R4096),
            other => Err(ConfigError::UnsupportedBakeResolution(other)),
        }
    }
}

impl From<BakeResolution> for u32 {
    fn from(value: BakeResolution) -> Self {
        value.pixels()
    }
}

/// Settings for a packing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Square size used when a material has no bitmap sources at all, and
    /// for whole-material fallback bakes.
    pub default_resolution: u32,
    /// Size of AO and emission auto-bakes.
    pub bake_resolution: BakeResolution,
    /// Bake ambient occlusion when no AO source is found.
    pub auto_bake_ao: bool,
    /// Bake emission when the emission socket has no bitmap source.
    pub auto_bake_emission: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            default_resolution: 2048,
            bake_resolution: BakeResolution::default(),
            auto_bake_ao: false,
            auto_bake_emission: false,
        }
    }
}

impl PackConfig {
    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_DEFAULT_RESOLUTION..=MAX_DEFAULT_RESOLUTION).contains(&self.default_resolution) {
            return Err(ConfigError::DefaultResolutionOutOfRange {
                value: self.default_resolution,
                min: MIN_DEFAULT_RESOLUTION,
                max: MAX_DEFAULT_RESOLUTION,
            });
        }
        Ok(())
    }

    /// Parse a JSON config document. Call [`PackConfig::validate`] afterwards.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_valid() {
        let config = PackConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_resolution, 2048);
        assert_eq!(config.bake_resolution.pixels(), 2048);
    }

    #[test]
    fn default_resolution_bounds_are_inclusive() {
        for value in [256, 8192] {
            let config = PackConfig {
                default_resolution: value,
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "{}", value);
        }
        for value in [255, 8193, 0] {
            let config = PackConfig {
                default_resolution: value,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{}", value);
        }
    }

    #[test]
    fn bake_resolution_is_a_bare_integer_in_json() {
        let config = PackConfig::from_json(r#"{"bake_resolution": 1024, "auto_bake_ao": true}"#)
            .unwrap();
        assert_eq!(config.bake_resolution, BakeResolution::R1024);
        assert!(config.auto_bake_ao);
        assert!(!config.auto_bake_emission);

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["bake_resolution"], 1024);
    }

    #[test]
    fn unsupported_bake_resolution_is_rejected() {
        assert!(PackConfig::from_json(r#"{"bake_resolution": 1000}"#).is_err());
        assert_eq!(
            BakeResolution::try_from(300),
            Err(ConfigError::UnsupportedBakeResolution(300))
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(PackConfig::from_json(r#"{"resolution": 1024}"#).is_err());
    }
}
