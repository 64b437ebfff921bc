//! The two passes of the photon map integrator.
//!
//! - PhotonTracer (emission and gather)
//! - volume_radiance (point and beam estimators for media)
//!
//! ## Photon Mapping
//!
//! Light paths deposit photons, camera paths look them up. Surfaces
//! use a k-nearest-neighbour density estimate; inside media either
//! every volume photon is a small sphere the camera ray can pierce
//! (points) or every segment of a light path is a beam the camera ray
//! can pass close to (beams).

pub mod photon_map;
pub mod volume_radiance;
