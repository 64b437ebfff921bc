//! A **Primitive** is anything the tracers can hit or sample light
//! from: geometric shapes with a BSDF, area emitters, point lights and
//! environment (infinite) emitters. Emitters are primitives as well,
//! so emission, intersection and medium boundaries all go through one
//! trait.

// pbrt
use crate::core::common::{Float, Spectrum};
use crate::core::geometry::{Normal3f, Point3f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::medium::Medium;
use crate::core::sampler::Sampler;

/// A point on an emitter (or camera) together with its sampling
/// weight (value divided by pdf).
#[derive(Debug, Default, Copy, Clone)]
pub struct PositionSample {
    pub p: Point3f,
    pub ng: Normal3f,
    pub weight: Spectrum,
    pub pdf: Float,
}

/// An emission (or camera) direction together with its sampling
/// weight.
#[derive(Debug, Default, Copy, Clone)]
pub struct DirectionSample {
    pub d: Vector3f,
    pub weight: Spectrum,
    pub pdf: Float,
}

pub trait Primitive: Send + Sync {
    /// Nearest hit within `[ray.t_min, ray.t_max]`.
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction<'_>>;
    /// Environment-type emitters are only found by
    /// `Scene::intersect_infinites()`.
    fn is_infinite(&self) -> bool {
        false
    }
    fn is_emissive(&self) -> bool;
    /// Photons can be emitted from this primitive.
    fn is_samplable(&self) -> bool;
    /// Emitted radiance towards `-isect.w`.
    fn eval_direct(&self, isect: &SurfaceInteraction) -> Spectrum;
    fn sample_position(&self, sampler: &mut dyn Sampler) -> Option<PositionSample>;
    fn sample_direction(
        &self,
        sampler: &mut dyn Sampler,
        point: &PositionSample,
    ) -> Option<DirectionSample>;
    /// Rough estimate of the emitted power, used for light selection.
    fn approximate_power(&self) -> Float;
    fn int_medium(&self) -> Option<&dyn Medium> {
        None
    }
    fn ext_medium(&self) -> Option<&dyn Medium> {
        None
    }
    /// Does crossing this primitive change the active medium?
    fn overrides_media(&self) -> bool {
        self.int_medium().is_some() || self.ext_medium().is_some()
    }
    /// Medium entered by a ray leaving the surface on the given side of
    /// the geometric normal.
    fn select_medium<'a>(
        &'a self,
        current: Option<&'a dyn Medium>,
        backside: bool,
    ) -> Option<&'a dyn Medium> {
        if !self.overrides_media() {
            current
        } else if backside {
            self.int_medium()
        } else {
            self.ext_medium()
        }
    }
}
