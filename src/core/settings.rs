//! Configuration consumed by the photon tracers.

// others
use strum_macros::{Display, EnumString};
use thiserror::Error;
// pbrt
use crate::core::common::Float;

/// Which volumetric estimator the gather pass uses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum VolumePhotonType {
    Points,
    Beams,
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("gather count must be at least one")]
    ZeroGatherCount,
    #[error("max bounces must be at least one")]
    ZeroMaxBounces,
    #[error("min bounces ({min}) must be smaller than max bounces ({max})")]
    BounceRange { min: u32, max: u32 },
    #[error("{name} must be positive and finite, got {value}")]
    InvalidRadius { name: &'static str, value: Float },
}

#[derive(Debug, Copy, Clone)]
pub struct PhotonMapSettings {
    pub photon_count: usize,
    pub volume_photon_count: usize,
    pub path_photon_count: usize,
    pub gather_count: usize,
    pub max_bounces: u32,
    pub min_bounces: u32,
    pub gather_radius: Float,
    pub volume_gather_radius: Float,
    pub volume_photon_type: VolumePhotonType,
    pub enable_consistency_checks: bool,
    pub enable_two_sided_shading: bool,
}

impl Default for PhotonMapSettings {
    fn default() -> Self {
        PhotonMapSettings {
            photon_count: 1_000_000,
            volume_photon_count: 1_000_000,
            path_photon_count: 1_000_000,
            gather_count: 20,
            max_bounces: 64,
            min_bounces: 0,
            gather_radius: 1e30 as Float,
            volume_gather_radius: 1e30 as Float,
            volume_photon_type: VolumePhotonType::Points,
            enable_consistency_checks: true,
            enable_two_sided_shading: true,
        }
    }
}

impl PhotonMapSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.gather_count == 0 {
            return Err(SettingsError::ZeroGatherCount);
        }
        if self.max_bounces == 0 {
            return Err(SettingsError::ZeroMaxBounces);
        }
        if self.min_bounces >= self.max_bounces {
            return Err(SettingsError::BounceRange {
                min: self.min_bounces,
                max: self.max_bounces,
            });
        }
        for (name, value) in [
            ("gather radius", self.gather_radius),
            ("volume gather radius", self.volume_gather_radius),
        ]
        .iter()
        {
            if !(value.is_finite() && *value > 0.0 as Float) {
                return Err(SettingsError::InvalidRadius {
                    name: *name,
                    value: *value,
                });
            }
        }
        Ok(())
    }
    /// Combined path-length filter: a photon deposited after
    /// `photon_bounce` scattering events joins a camera path with
    /// `camera_bounce` events at a shared vertex, so the full path has
    /// `camera_bounce + photon_bounce - 1` bounces.
    pub fn accepts_path_length(&self, camera_bounce: u32, photon_bounce: u32) -> bool {
        let full_path: i64 = camera_bounce as i64 + photon_bounce as i64 - 1;
        full_path >= self.min_bounces as i64 && full_path < self.max_bounces as i64
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn defaults_are_valid() {
        let settings = PhotonMapSettings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.gather_count, 20);
        assert_eq!(settings.max_bounces, 64);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut settings = PhotonMapSettings::default();
        settings.gather_count = 0;
        assert_eq!(settings.validate(), Err(SettingsError::ZeroGatherCount));
        let mut settings = PhotonMapSettings::default();
        settings.min_bounces = 64;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::BounceRange { min: 64, max: 64 })
        );
        let mut settings = PhotonMapSettings::default();
        settings.max_bounces = 0;
        assert_eq!(settings.validate(), Err(SettingsError::ZeroMaxBounces));
        let mut settings = PhotonMapSettings::default();
        settings.volume_gather_radius = -1.0;
        assert!(settings.validate().is_err());
        settings.volume_gather_radius = Float::INFINITY;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn path_length_boundaries() {
        let mut settings = PhotonMapSettings::default();
        settings.min_bounces = 2;
        settings.max_bounces = 5;
        // full path = camera + photon - 1
        assert!(!settings.accepts_path_length(1, 1)); // min - 1
        assert!(settings.accepts_path_length(1, 2)); // min
        assert!(settings.accepts_path_length(2, 3)); // max - 1
        assert!(!settings.accepts_path_length(3, 3)); // max
        settings.min_bounces = 0;
        assert!(settings.accepts_path_length(0, 1));
        assert!(!settings.accepts_path_length(0, 0));
    }

    #[test]
    fn volume_photon_type_names() {
        assert_eq!(
            VolumePhotonType::from_str("beams"),
            Ok(VolumePhotonType::Beams)
        );
        assert_eq!(VolumePhotonType::Points.to_string(), "points");
        assert!(VolumePhotonType::from_str("splats").is_err());
    }
}
