// pbrt
use crate::core::common::{Float, Spectrum};
use crate::core::interaction::SurfaceScatterEvent;
use crate::core::reflection::{lobe_matches, Bsdf, BxdfType};
use crate::core::sampler::Sampler;

/// Invisible surface, light passes straight through. Used for medium
/// boundaries.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullBsdf {}

impl Bsdf for NullBsdf {
    fn lobes(&self) -> u8 {
        BxdfType::BsdfForward as u8
    }
    fn eval(&self, event: &SurfaceScatterEvent, _adjoint: bool) -> Spectrum {
        if !lobe_matches(self.lobes(), event.requested_lobe) {
            return Spectrum::default();
        }
        if (event.wo + event.wi).length_squared() > 1e-6 as Float {
            return Spectrum::default();
        }
        Spectrum::new(1.0 as Float)
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
        event.wo = -event.wi;
        event.pdf = 1.0 as Float;
        event.weight = Spectrum::new(1.0 as Float);
        event.sampled_lobe = self.lobes();
        true
    }
}
