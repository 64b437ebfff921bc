// std
use std::sync::Arc;
// pbrt
use crate::core::common::{Float, Spectrum};
use crate::core::geometry::{Point3f, Ray};
use crate::core::interaction::SurfaceInteraction;
use crate::core::medium::Medium;
use crate::core::primitive::{DirectionSample, PositionSample, Primitive};
use crate::core::sampler::Sampler;
use crate::core::sampling::{uniform_sample_sphere, uniform_sphere_pdf};

/// Isotropic point light source that emits the total flux `power`
/// uniformly in all directions. It can not be hit by rays. Photons
/// start out in `medium`.
pub struct PointLight {
    pub p_light: Point3f,
    pub power: Spectrum,
    pub medium: Option<Arc<dyn Medium>>,
}

impl PointLight {
    pub fn new(p_light: Point3f, power: Spectrum) -> Self {
        PointLight {
            p_light,
            power,
            medium: None,
        }
    }
    pub fn with_medium(mut self, medium: Option<Arc<dyn Medium>>) -> Self {
        self.medium = medium;
        self
    }
}

impl Primitive for PointLight {
    fn intersect(&self, _ray: &Ray) -> Option<SurfaceInteraction<'_>> {
        None
    }
    fn is_emissive(&self) -> bool {
        true
    }
    fn is_samplable(&self) -> bool {
        true
    }
    fn eval_direct(&self, _isect: &SurfaceInteraction) -> Spectrum {
        Spectrum::default()
    }
    fn sample_position(&self, _sampler: &mut dyn Sampler) -> Option<PositionSample> {
        Some(PositionSample {
            p: self.p_light,
            ng: Default::default(),
            weight: self.power,
            pdf: 1.0 as Float,
        })
    }
    fn sample_direction(
        &self,
        sampler: &mut dyn Sampler,
        _point: &PositionSample,
    ) -> Option<DirectionSample> {
        Some(DirectionSample {
            d: uniform_sample_sphere(&sampler.get_2d()),
            weight: Spectrum::new(1.0 as Float),
            pdf: uniform_sphere_pdf(),
        })
    }
    fn approximate_power(&self) -> Float {
        self.power.average()
    }
    fn ext_medium(&self) -> Option<&dyn Medium> {
        self.medium.as_deref()
    }
}
