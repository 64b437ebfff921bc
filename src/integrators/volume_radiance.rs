//! In-scattered radiance along a camera ray segment inside a medium,
//! estimated from the volume photons.
//!
//! Two interchangeable estimators:
//!
//! - **Points**: every volume photon is a sphere with its own kernel
//!   radius; the camera ray collects the photons whose spheres it
//!   pierces.
//! - **Beams**: consecutive path photons form line segments; the
//!   camera ray collects every segment that passes within the volume
//!   gather radius.

// pbrt
use crate::accelerators::{BeamLookup, VolumePhotonLookup};
use crate::core::common::{Float, Spectrum, INV_PI};
use crate::core::geometry::{vec3_cross_vec3, vec3_dot_vec3f, vec3_max_dimensionf};
use crate::core::geometry::{Bounds3f, Point3f, Ray, Vector3f, XYZEnum};
use crate::core::medium::Medium;
use crate::core::photon::{PathPhoton, VolumePhoton};
use crate::core::sampler::Sampler;
use crate::core::settings::PhotonMapSettings;

/// Point of closest approach between a camera ray and a photon beam.
#[derive(Debug, Copy, Clone)]
pub struct BeamHit {
    /// parameter along the camera ray
    pub t: Float,
    /// distance along the beam from its start
    pub s: Float,
    /// 1 / sin of the angle between ray and beam
    pub inv_sin_theta: Float,
    /// point on the camera ray
    pub p: Point3f,
}

/// Closest approach between `ray` and the beam starting at
/// `beam_origin`. Rejects beams further than `radius` away, hits
/// outside either segment and hits outside the beam's `bounds` along
/// the beam's dominant axis.
pub fn beam_closest_approach(
    ray: &Ray,
    beam_origin: &Point3f,
    beam_dir: &Vector3f,
    beam_length: Float,
    bounds: &Bounds3f,
    radius: Float,
) -> Option<BeamHit> {
    // common perpendicular of both lines
    let u: Vector3f = vec3_cross_vec3(&ray.d, beam_dir);
    let inv_sin_theta: Float = 1.0 as Float / u.length();
    if !inv_sin_theta.is_finite() {
        // parallel lines
        return None;
    }
    let l: Vector3f = *beam_origin - ray.o;
    let d: Float = inv_sin_theta * vec3_dot_vec3f(&u, &l);
    if d.abs() > radius {
        return None;
    }
    let n: Vector3f = vec3_cross_vec3(beam_dir, &u);
    let t: Float = vec3_dot_vec3f(&n, &l) / vec3_dot_vec3f(&n, &ray.d);
    let p: Point3f = ray.position(t);
    let major_axis: XYZEnum = vec3_max_dimensionf(&beam_dir.abs());
    if p[major_axis] < bounds.p_min[major_axis] || p[major_axis] > bounds.p_max[major_axis] {
        return None;
    }
    let s: Float = vec3_dot_vec3f(beam_dir, &(p - *beam_origin));
    if t >= ray.t_min && t <= ray.t_max && s >= 0.0 as Float && s <= beam_length {
        Some(BeamHit {
            t,
            s,
            inv_sin_theta,
            p,
        })
    } else {
        None
    }
}

/// Point-kernel estimate over the volume photons along `ray`, for a
/// camera path that has scattered `bounce` times.
pub fn estimate_points(
    settings: &PhotonMapSettings,
    bounce: u32,
    ray: &Ray,
    medium: &dyn Medium,
    lookup: &dyn VolumePhotonLookup,
    sampler: &mut dyn Sampler,
) -> Spectrum {
    let mut estimate: Spectrum = Spectrum::default();
    lookup.beam_query(
        &ray.o,
        &ray.d,
        ray.t_max,
        &mut |photon: &VolumePhoton, t: Float, dist_sq: Float| {
            if !settings.accepts_path_length(bounce, photon.bounce) {
                return;
            }
            let mut medium_query: Ray = *ray;
            medium_query.t_max = t.max(ray.t_min);
            let falloff: Float = 1.0 as Float - dist_sq / photon.radius_sq;
            let kernel: Float = 3.0 as Float * INV_PI * falloff * falloff / photon.radius_sq;
            let phase: Float = medium
                .phase_function(&photon.pos)
                .eval(&ray.d, &-photon.dir);
            let tr: Spectrum = medium.transmittance(sampler, &medium_query);
            estimate += tr * photon.power * (kernel * phase);
        },
    );
    estimate
}

/// Beam estimate over the path photon segments near `ray`, for a
/// camera path that has scattered `bounce` times.
#[allow(clippy::too_many_arguments)]
pub fn estimate_beams(
    settings: &PhotonMapSettings,
    bounce: u32,
    ray: &Ray,
    medium: &dyn Medium,
    bvh: &dyn BeamLookup,
    path_photons: &[PathPhoton],
    radius: Float,
    sampler: &mut dyn Sampler,
) -> Spectrum {
    let mut estimate: Spectrum = Spectrum::default();
    bvh.trace(ray, &mut |ray: &Ray, index: usize, bounds: &Bounds3f| {
        let (p0, p1) = match (path_photons.get(index), path_photons.get(index + 1)) {
            (Some(p0), Some(p1)) => (p0, p1),
            _ => return,
        };
        if !settings.accepts_path_length(bounce, p1.bounce()) {
            return;
        }
        let hit: BeamHit =
            match beam_closest_approach(ray, &p0.pos, &p0.dir, p0.length, bounds, radius) {
                Some(hit) => hit,
                None => return,
            };
        let mut medium_query: Ray = *ray;
        medium_query.t_max = hit.t;
        let phase: Float = medium.phase_function(&hit.p).eval(&ray.d, &-p0.dir);
        estimate += medium.sigma_t(&hit.p)
            * medium.transmittance(sampler, &medium_query)
            * p1.power
            * (hit.inv_sin_theta / (2.0 as Float * radius) * phase);
    });
    estimate
}
