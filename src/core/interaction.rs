//! The resolved record of a ray hitting a surface
//! (**SurfaceInteraction**) and the short-lived local description of
//! one scattering interaction at that surface
//! (**SurfaceScatterEvent**).

// pbrt
use crate::core::common::{Float, Spectrum};
use crate::core::geometry::{vec3_coordinate_system, vec3_dot_vec3f};
use crate::core::geometry::{Normal3f, Point3f, Vector3f};
use crate::core::primitive::Primitive;
use crate::core::reflection::{Bsdf, BxdfType};

/// Orthonormal basis around a normal.
#[derive(Debug, Default, Copy, Clone)]
pub struct TangentFrame {
    pub normal: Vector3f,
    pub tangent: Vector3f,
    pub bitangent: Vector3f,
}

impl TangentFrame {
    pub fn new(n: &Normal3f) -> Self {
        let normal: Vector3f = Vector3f::from(*n);
        let (tangent, bitangent) = vec3_coordinate_system(&normal);
        TangentFrame {
            normal,
            tangent,
            bitangent,
        }
    }
    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f {
            x: vec3_dot_vec3f(v, &self.tangent),
            y: vec3_dot_vec3f(v, &self.bitangent),
            z: vec3_dot_vec3f(v, &self.normal),
        }
    }
    pub fn to_global(&self, v: &Vector3f) -> Vector3f {
        self.tangent * v.x + self.bitangent * v.y + self.normal * v.z
    }
}

/// Information about the nearest hit of a ray.
#[derive(Copy, Clone)]
pub struct SurfaceInteraction<'a> {
    /// hit point
    pub p: Point3f,
    /// ray parameter of the hit
    pub t: Float,
    /// geometric normal
    pub ng: Normal3f,
    /// shading normal
    pub ns: Normal3f,
    /// direction of the incoming ray
    pub w: Vector3f,
    /// offset used to continue rays from the hit point
    pub epsilon: Float,
    pub bsdf: &'a dyn Bsdf,
    pub primitive: &'a dyn Primitive,
}

/// One scattering interaction in local shading space. `wi` points
/// away from the surface towards where the path came from.
#[derive(Debug, Copy, Clone)]
pub struct SurfaceScatterEvent {
    pub frame: TangentFrame,
    pub wi: Vector3f,
    pub wo: Vector3f,
    pub weight: Spectrum,
    pub pdf: Float,
    pub requested_lobe: u8,
    pub sampled_lobe: u8,
    pub flipped_frame: bool,
}

impl SurfaceScatterEvent {
    pub fn new(frame: TangentFrame, wi: Vector3f, requested_lobe: u8, flipped_frame: bool) -> Self {
        SurfaceScatterEvent {
            frame,
            wi,
            wo: Vector3f::default(),
            weight: Spectrum::new(1.0 as Float),
            pdf: 1.0 as Float,
            requested_lobe,
            sampled_lobe: 0_u8,
            flipped_frame,
        }
    }
    /// Pass-through event (wo == -wi) used to query the transparency
    /// of a surface.
    pub fn make_forward_event(&self) -> SurfaceScatterEvent {
        let mut event: SurfaceScatterEvent = *self;
        event.wo = -self.wi;
        event.requested_lobe = BxdfType::BsdfForward as u8;
        event
    }
}
