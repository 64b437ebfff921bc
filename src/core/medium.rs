//! Participating media: the **Medium** contract consumed by both
//! tracers, the per-path **MediumState** and the Henyey-Greenstein
//! phase function.

// pbrt
use crate::core::common::{Float, Spectrum, INV_4_PI, PI};
use crate::core::geometry::{vec3_coordinate_system, vec3_dot_vec3f};
use crate::core::geometry::{Point3f, Ray, Vector3f};
use crate::core::sampler::Sampler;
use crate::core::sampling::uniform_sample_sphere;

/// Running state of one path inside media. Reset whenever the path
/// crosses a surface.
#[derive(Debug, Copy, Clone)]
pub struct MediumState {
    pub first_scatter: bool,
    pub bounce: u32,
}

impl Default for MediumState {
    fn default() -> Self {
        MediumState {
            first_scatter: true,
            bounce: 0_u32,
        }
    }
}

impl MediumState {
    pub fn reset(&mut self) {
        self.first_scatter = true;
        self.bounce = 0_u32;
    }
    pub fn advance(&mut self) {
        self.first_scatter = false;
        self.bounce += 1;
    }
}

/// Result of free-flight sampling. If `exited` is set the sample lies
/// on the end of the ray segment, otherwise it is a scattering point
/// inside the medium.
pub struct MediumSample<'a> {
    pub p: Point3f,
    pub t: Float,
    pub weight: Spectrum,
    pub pdf: Float,
    pub exited: bool,
    pub phase: &'a dyn PhaseFunction,
}

pub trait Medium: Send + Sync {
    fn sample_distance(
        &self,
        sampler: &mut dyn Sampler,
        ray: &Ray,
        state: &mut MediumState,
    ) -> Option<MediumSample<'_>>;
    /// Transmittance along `[ray.t_min, ray.t_max]`.
    fn transmittance(&self, sampler: &mut dyn Sampler, ray: &Ray) -> Spectrum;
    fn phase_function(&self, p: &Point3f) -> &dyn PhaseFunction;
    fn sigma_t(&self, p: &Point3f) -> Spectrum;
}

#[derive(Debug, Copy, Clone)]
pub struct PhaseSample {
    pub w: Vector3f,
    pub weight: Spectrum,
    pub pdf: Float,
}

/// Directions passed to a phase function follow the propagation
/// convention: `wi` is the direction light travels before the
/// scattering event, `wo` afterwards.
pub trait PhaseFunction: Send + Sync {
    fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> Float;
    fn sample(&self, sampler: &mut dyn Sampler, wi: &Vector3f) -> Option<PhaseSample>;
}

#[inline]
pub fn phase_hg(cos_theta: Float, g: Float) -> Float {
    let denom: Float = 1.0 as Float + g * g - 2.0 as Float * g * cos_theta;
    INV_4_PI * (1.0 as Float - g * g) / (denom * denom.sqrt())
}

#[derive(Debug, Default, Copy, Clone)]
pub struct HenyeyGreenstein {
    pub g: Float,
}

impl HenyeyGreenstein {
    pub fn new(g: Float) -> Self {
        HenyeyGreenstein { g }
    }
}

impl PhaseFunction for HenyeyGreenstein {
    fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> Float {
        phase_hg(vec3_dot_vec3f(wi, wo), self.g)
    }
    fn sample(&self, sampler: &mut dyn Sampler, wi: &Vector3f) -> Option<PhaseSample> {
        let u = sampler.get_2d();
        if self.g == 0.0 as Float {
            return Some(PhaseSample {
                w: uniform_sample_sphere(&u),
                weight: Spectrum::new(1.0 as Float),
                pdf: INV_4_PI,
            });
        }
        // invert the HG CDF around the propagation direction
        let g: Float = self.g;
        let d: Float = (1.0 as Float - g * g) / (1.0 as Float - g + 2.0 as Float * g * u.y);
        let cos_theta: Float = ((1.0 as Float + g * g - d * d) / (2.0 as Float * g))
            .max(-1.0)
            .min(1.0);
        let sin_theta: Float = (0.0 as Float).max(1.0 as Float - cos_theta * cos_theta).sqrt();
        let phi: Float = 2.0 as Float * PI * u.x;
        let (t, b) = vec3_coordinate_system(wi);
        let w: Vector3f =
            t * (phi.cos() * sin_theta) + b * (phi.sin() * sin_theta) + *wi * cos_theta;
        Some(PhaseSample {
            w,
            weight: Spectrum::new(1.0 as Float),
            pdf: phase_hg(cos_theta, g),
        })
    }
}
