// pbrt
use crate::core::common::{Float, Spectrum, INV_PI};
use crate::core::interaction::SurfaceScatterEvent;
use crate::core::reflection::{lobe_matches, Bsdf, BxdfType};
use crate::core::sampler::Sampler;
use crate::core::sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere};

/// Describes a purely diffuse surface.
#[derive(Debug, Copy, Clone)]
pub struct LambertBsdf {
    pub albedo: Spectrum, // default: 0.5
}

impl LambertBsdf {
    pub fn new(albedo: Spectrum) -> Self {
        LambertBsdf { albedo }
    }
}

impl Default for LambertBsdf {
    fn default() -> Self {
        LambertBsdf {
            albedo: Spectrum::new(0.5 as Float),
        }
    }
}

impl Bsdf for LambertBsdf {
    fn lobes(&self) -> u8 {
        BxdfType::BsdfDiffuse as u8 | BxdfType::BsdfReflection as u8
    }
    fn eval(&self, event: &SurfaceScatterEvent, _adjoint: bool) -> Spectrum {
        if !lobe_matches(self.lobes(), event.requested_lobe) {
            return Spectrum::default();
        }
        if event.wi.z <= 0.0 as Float || event.wo.z <= 0.0 as Float {
            return Spectrum::default();
        }
        self.albedo * (INV_PI * event.wo.z)
    }
    fn sample(
        &self,
        event: &mut SurfaceScatterEvent,
        sampler: &mut dyn Sampler,
        _adjoint: bool,
    ) -> bool {
        if !lobe_matches(self.lobes(), event.requested_lobe) {
            return false;
        }
        if event.wi.z <= 0.0 as Float {
            return false;
        }
        event.wo = cosine_sample_hemisphere(&sampler.get_2d());
        event.pdf = cosine_hemisphere_pdf(event.wo.z);
        event.weight = self.albedo;
        event.sampled_lobe = self.lobes();
        true
    }
}
