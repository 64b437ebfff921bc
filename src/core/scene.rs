//! # Scene
//!
//! The **Scene** stores the primitives and the camera. At
//! construction the primitives photons can be emitted from and the
//! infinite (environment) primitives are split out, so the tracers
//! never have to filter them again.
//!

// std
use std::sync::Arc;
// pbrt
use crate::core::camera::Camera;
use crate::core::common::Float;
use crate::core::geometry::{Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::primitive::Primitive;
use crate::core::sampling::Distribution1D;

pub struct Scene {
    pub primitives: Vec<Arc<dyn Primitive>>,
    /// samplable emitters
    pub lights: Vec<Arc<dyn Primitive>>,
    pub infinites: Vec<Arc<dyn Primitive>>,
    pub camera: Arc<dyn Camera>,
}

impl Scene {
    pub fn new(primitives: Vec<Arc<dyn Primitive>>, camera: Arc<dyn Camera>) -> Self {
        let mut lights: Vec<Arc<dyn Primitive>> = Vec::new();
        let mut infinites: Vec<Arc<dyn Primitive>> = Vec::new();
        let mut finites: Vec<Arc<dyn Primitive>> = Vec::with_capacity(primitives.len());
        for primitive in primitives {
            if primitive.is_emissive() && primitive.is_samplable() {
                lights.push(primitive.clone());
            }
            if primitive.is_infinite() {
                infinites.push(primitive);
            } else {
                finites.push(primitive);
            }
        }
        log::debug!(
            "scene: {} primitives, {} lights, {} infinites",
            finites.len(),
            lights.len(),
            infinites.len()
        );
        Scene {
            primitives: finites,
            lights,
            infinites,
            camera,
        }
    }
    /// Finds the nearest finite hit and clamps `ray.t_max` to it.
    pub fn intersect(&self, ray: &mut Ray) -> Option<SurfaceInteraction<'_>> {
        assert_ne!(ray.d, Vector3f::default());
        let mut nearest: Option<SurfaceInteraction> = None;
        for primitive in &self.primitives {
            if let Some(isect) = primitive.intersect(ray) {
                ray.t_max = isect.t;
                nearest = Some(isect);
            }
        }
        nearest
    }
    pub fn intersect_infinites(&self, ray: &Ray) -> Option<SurfaceInteraction<'_>> {
        self.infinites
            .iter()
            .find_map(|primitive| primitive.intersect(ray))
    }
}

/// Distribution over the samplable lights proportional to their
/// approximate power, used for adjoint light selection. Returns `None`
/// for a scene without lights.
pub fn compute_light_power_distribution(scene: &Scene) -> Option<Distribution1D> {
    if scene.lights.is_empty() {
        return None;
    }
    let light_power: Vec<Float> = scene
        .lights
        .iter()
        .map(|light| light.approximate_power().max(0.0 as Float))
        .collect();
    Some(Distribution1D::new(light_power))
}
