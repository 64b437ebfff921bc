// pbrt
use crate::core::common::{Float, Spectrum};
use crate::core::geometry::{Normal3f, Ray};
use crate::core::interaction::SurfaceInteraction;
use crate::core::primitive::{DirectionSample, PositionSample, Primitive};
use crate::core::sampler::Sampler;
use crate::materials::null::NullBsdf;

/// Constant radiance arriving from all directions at infinity. It is
/// only found by `Scene::intersect_infinites()` and does not emit
/// photons.
#[derive(Debug, Copy, Clone)]
pub struct InfiniteSphere {
    pub emission: Spectrum,
    bsdf: NullBsdf,
}

impl InfiniteSphere {
    pub fn new(emission: Spectrum) -> Self {
        InfiniteSphere {
            emission,
            bsdf: NullBsdf::default(),
        }
    }
}

impl Primitive for InfiniteSphere {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction<'_>> {
        if ray.t_max.is_finite() {
            return None;
        }
        let n: Normal3f = Normal3f::from(-ray.d);
        Some(SurfaceInteraction {
            p: ray.o,
            t: Float::INFINITY,
            ng: n,
            ns: n,
            w: ray.d,
            epsilon: 0.0 as Float,
            bsdf: &self.bsdf,
            primitive: self,
        })
    }
    fn is_infinite(&self) -> bool {
        true
    }
    fn is_emissive(&self) -> bool {
        !self.emission.is_black()
    }
    fn is_samplable(&self) -> bool {
        false
    }
    fn eval_direct(&self, _isect: &SurfaceInteraction) -> Spectrum {
        self.emission
    }
    fn sample_position(&self, _sampler: &mut dyn Sampler) -> Option<PositionSample> {
        None
    }
    fn sample_direction(
        &self,
        _sampler: &mut dyn Sampler,
        _point: &PositionSample,
    ) -> Option<DirectionSample> {
        None
    }
    fn approximate_power(&self) -> Float {
        0.0 as Float
    }
}
