//! When light hits a surface it is reflected, transmitted or passes
//! straight through. The **Bsdf** trait is the contract the tracers
//! consume: which lobes a surface has, how to evaluate it for a pair
//! of local directions and how to sample an outgoing direction.
//!
//! All directions handed to a BSDF live in the local shading frame of
//! the [`SurfaceScatterEvent`], with the shading normal along +z.
//! `eval()` returns the BSDF value already multiplied by
//! |cos θ<sub>o</sub>|, `sample()` writes a weight that is the BSDF
//! value times the cosine divided by the pdf.

// pbrt
use crate::core::common::Spectrum;
use crate::core::interaction::SurfaceScatterEvent;
use crate::core::sampler::Sampler;

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BxdfType {
    BsdfReflection = 1,
    BsdfTransmission = 2,
    BsdfDiffuse = 4,
    BsdfGlossy = 8,
    BsdfSpecular = 16,
    /// straight pass-through, wo == -wi
    BsdfForward = 32,
    BsdfAll = 63,
}

/// Lobes a camera path is allowed to continue through before it falls
/// back to density estimation.
pub const SPECULAR_LOBES: u8 = BxdfType::BsdfSpecular as u8
    | BxdfType::BsdfForward as u8
    | BxdfType::BsdfReflection as u8
    | BxdfType::BsdfTransmission as u8;

/// A component of type *lobe* can answer a request for *requested*
/// if all of its flags are part of the request.
pub fn lobe_matches(lobe: u8, requested: u8) -> bool {
    (lobe & requested) == lobe
}

/// Only specular (or forward) lobes; a surface without any lobe
/// counts as pure specular as well.
pub fn is_pure_specular(lobes: u8) -> bool {
    lobes & (BxdfType::BsdfDiffuse as u8 | BxdfType::BsdfGlossy as u8) == 0_u8
}

pub fn has_specular(lobes: u8) -> bool {
    lobes & (BxdfType::BsdfSpecular as u8 | BxdfType::BsdfForward as u8) != 0_u8
}

pub fn is_transmissive(lobes: u8) -> bool {
    lobes & (BxdfType::BsdfTransmission as u8 | BxdfType::BsdfForward as u8) != 0_u8
}

pub trait Bsdf: Send + Sync {
    /// Union of the lobes the BSDF is made of.
    fn lobes(&self) -> u8;
    /// Evaluate for `event.wi`/`event.wo`, restricted to
    /// `event.requested_lobe`.
    fn eval(&self, event: &SurfaceScatterEvent, adjoint: bool) -> Spectrum;
    /// Sample `event.wo` from the requested lobes. Returns false if no
    /// sample could be generated.
    fn sample(
        &self,
        event: &mut SurfaceScatterEvent,
        sampler: &mut dyn Sampler,
        adjoint: bool,
    ) -> bool;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lobe_classification() {
        let diffuse: u8 = BxdfType::BsdfDiffuse as u8 | BxdfType::BsdfReflection as u8;
        let mirror: u8 = BxdfType::BsdfSpecular as u8 | BxdfType::BsdfReflection as u8;
        let forward: u8 = BxdfType::BsdfForward as u8;
        assert!(!is_pure_specular(diffuse));
        assert!(is_pure_specular(mirror));
        assert!(is_pure_specular(forward));
        assert!(is_pure_specular(0_u8));
        assert!(is_transmissive(forward));
        assert!(!is_transmissive(mirror));
        assert!(has_specular(mirror));
        assert!(!has_specular(diffuse));
    }

    #[test]
    fn specular_request_excludes_diffuse() {
        let diffuse: u8 = BxdfType::BsdfDiffuse as u8 | BxdfType::BsdfReflection as u8;
        let mirror: u8 = BxdfType::BsdfSpecular as u8 | BxdfType::BsdfReflection as u8;
        assert!(!lobe_matches(diffuse, SPECULAR_LOBES));
        assert!(lobe_matches(mirror, SPECULAR_LOBES));
        assert!(lobe_matches(BxdfType::BsdfForward as u8, SPECULAR_LOBES));
        assert!(lobe_matches(diffuse, BxdfType::BsdfAll as u8));
        assert!(!lobe_matches(mirror, BxdfType::BsdfForward as u8));
    }
}
