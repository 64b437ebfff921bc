// pbrt
use crate::core::common::Spectrum;
use crate::core::geometry::Vector3f;
use crate::core::interaction::SurfaceScatterEvent;
use crate::core::reflection::{lobe_matches, Bsdf, BxdfType};
use crate::core::sampler::Sampler;

/// A simple mirror, modeled with perfect specular reflection.
#[derive(Debug, Copy, Clone)]
pub struct MirrorBsdf {
    pub albedo: Spectrum,
}

impl MirrorBsdf {
    pub fn new(albedo: Spectrum) -> Self {
        MirrorBsdf { albedo }
    }
}

impl Bsdf for MirrorBsdf {
    fn lobes(&self) -> u8 {
        BxdfType::BsdfSpecular as u8 | BxdfType::BsdfReflection as u8
    }
    fn eval(&self, _event: &SurfaceScatterEvent, _adjoint: bool) -> Spectrum {
        // delta distribution
        Spectrum::default()
    }
    fn sample(
        &self,
        event: &mut SurfaceScatterEvent,
        _sampler: &mut dyn Sampler,
        _adjoint: bool,
    ) -> bool {
        if !lobe_matches(self.lobes(), event.requested_lobe) {
            return false;
        }
        event.wo = Vector3f::new(-event.wi.x, -event.wi.y, event.wi.z);
        event.pdf = 1.0;
        event.weight = self.albedo;
        event.sampled_lobe = self.lobes();
        true
    }
}
