//! Spatial indices over the deposited photons. Density estimation
//! would be quadratic in the number of photons without them: every
//! gather point would test every photon.
//!
//! - KdTree (k nearest neighbours on surfaces, ray queries against
//!   volume photons)
//! - BeamBvh (camera ray against photon beams)
//!
//! The tracers only see the traits below, so other index
//! implementations can be plugged in.

// pbrt
use crate::core::common::Float;
use crate::core::geometry::{Bounds3f, Point3f, Ray, Vector3f};
use crate::core::photon::{PathPhoton, VolumePhoton};

pub mod bvh;
pub mod kdtree;

/// k-nearest-neighbour queries over point photons.
pub trait PhotonLookup<P>: Sync {
    fn photon(&self, index: usize) -> &P;
    /// Writes up to `indices.len()` nearest photons within `max_dist`
    /// of `pos`, sorted by increasing distance, and their squared
    /// distances. Returns how many were found.
    fn nearest_neighbours(
        &self,
        pos: &Point3f,
        indices: &mut [usize],
        dist_sq: &mut [Float],
        max_dist: Float,
    ) -> usize;
}

/// Ray queries against volume photons with a per-photon radius.
pub trait VolumePhotonLookup: Sync {
    /// Calls `visitor` with every photon whose kernel sphere is
    /// pierced by the segment `[0, far_t]` of the ray, the ray
    /// parameter of the closest approach and the squared distance at
    /// that point.
    fn beam_query(
        &self,
        pos: &Point3f,
        dir: &Vector3f,
        far_t: Float,
        visitor: &mut dyn FnMut(&VolumePhoton, Float, Float),
    );
}

/// Traversal of the bounding volumes of photon beams.
pub trait BeamLookup: Sync {
    /// Calls `visitor` with the ray, the index of the path photon the
    /// beam starts at and the beam's bounds for every candidate whose
    /// bounds the ray overlaps.
    fn trace(&self, ray: &Ray, visitor: &mut dyn FnMut(&Ray, usize, &Bounds3f));
}

/// Volumetric estimator used by the gather pass.
#[derive(Copy, Clone)]
pub enum VolumeLookup<'a> {
    None,
    Points(&'a dyn VolumePhotonLookup),
    Beams {
        bvh: &'a dyn BeamLookup,
        path_photons: &'a [PathPhoton],
    },
}
