//! Building blocks shared by the photon tracers: setting up the local
//! scattering event at a surface hit, sampling a surface scatter and
//! continuing the ray, finiteness checks and adjoint light selection.

// std
use std::sync::Arc;
// pbrt
use crate::core::common::{Float, Spectrum};
use crate::core::geometry::{vec3_dot_nrmf, vec3_dot_vec3f};
use crate::core::geometry::{Normal3f, Ray, Vector3f};
use crate::core::interaction::{SurfaceInteraction, SurfaceScatterEvent, TangentFrame};
use crate::core::medium::{Medium, MediumState};
use crate::core::primitive::Primitive;
use crate::core::reflection::{has_specular, is_transmissive, BxdfType};
use crate::core::sampler::Sampler;
use crate::core::sampling::Distribution1D;
use crate::core::scene::Scene;

/// Local scattering event at a hit. With two-sided shading the frame
/// is flipped towards the incoming ray for non-transmissive surfaces
/// hit from the back.
pub fn make_local_scatter_event(
    isect: &SurfaceInteraction,
    ray: &Ray,
    enable_two_sided_shading: bool,
) -> SurfaceScatterEvent {
    let mut frame: TangentFrame = TangentFrame::new(&isect.ns);
    let hit_backside: bool = vec3_dot_vec3f(&frame.normal, &ray.d) > 0.0 as Float;
    let flip_frame: bool =
        enable_two_sided_shading && hit_backside && !is_transmissive(isect.bsdf.lobes());
    if flip_frame {
        frame.normal = -frame.normal;
        frame.tangent = -frame.tangent;
    }
    let wi: Vector3f = frame.to_local(&-ray.d);
    SurfaceScatterEvent::new(frame, wi, BxdfType::BsdfAll as u8, flip_frame)
}

/// The sampled world direction `wo` has to leave on the same side of
/// the geometric normal as the local direction says it does.
pub fn is_consistent(
    event: &SurfaceScatterEvent,
    wo: &Vector3f,
    ng: &Normal3f,
    enable_consistency_checks: bool,
) -> bool {
    if !enable_consistency_checks {
        return true;
    }
    let geometric_backside: bool = vec3_dot_nrmf(wo, ng) < 0.0 as Float;
    let shading_backside: bool = (event.wo.z < 0.0 as Float) ^ event.flipped_frame;
    geometric_backside == shading_backside
}

/// Samples a scattering direction from all lobes of the BSDF at the
/// hit, updates throughput and the active medium and continues the
/// ray from the hit point. Returns false if the path has to end.
#[allow(clippy::too_many_arguments)]
pub fn handle_surface<'a>(
    event: &mut SurfaceScatterEvent,
    isect: &SurfaceInteraction<'a>,
    sampler: &mut dyn Sampler,
    medium: &mut Option<&'a dyn Medium>,
    ray: &mut Ray,
    throughput: &mut Spectrum,
    was_specular: &mut bool,
    state: &mut MediumState,
    adjoint: bool,
    enable_consistency_checks: bool,
) -> bool {
    event.requested_lobe = BxdfType::BsdfAll as u8;
    if !isect.bsdf.sample(event, sampler, adjoint) {
        return false;
    }
    let wo: Vector3f = event.frame.to_global(&event.wo);
    if !is_consistent(event, &wo, &isect.ng, enable_consistency_checks) {
        return false;
    }
    *throughput *= event.weight;
    *was_specular = has_specular(event.sampled_lobe);
    if !*was_specular {
        ray.primary = false;
    }
    let geometric_backside: bool = vec3_dot_nrmf(&wo, &isect.ng) < 0.0 as Float;
    *medium = isect.primitive.select_medium(*medium, geometric_backside);
    state.reset();
    *ray = ray.scatter(&isect.p, &wo, isect.epsilon);
    true
}

/// Explicit finiteness check after each throughput or direction
/// update.
pub fn is_path_valid(ray: &Ray, throughput: &Spectrum) -> bool {
    ray.o.is_finite() && ray.d.is_finite() && throughput.is_finite()
}

/// Picks a light proportional to its power. Returns the light together
/// with its selection probability.
pub fn choose_light_adjoint<'s>(
    light_distribution: &Distribution1D,
    scene: &'s Scene,
    sampler: &mut dyn Sampler,
) -> Option<(&'s Arc<dyn Primitive>, Float)> {
    if light_distribution.count() == 0 || scene.lights.is_empty() {
        return None;
    }
    let (light_num, light_pdf) = light_distribution.sample_discrete(sampler.get_1d());
    if light_pdf == 0.0 as Float {
        return None;
    }
    scene.lights.get(light_num).map(|light| (light, light_pdf))
}
