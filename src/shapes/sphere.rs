// std
use std::sync::Arc;
// pbrt
use crate::core::common::{quadratic, Float, Spectrum, DEFAULT_EPSILON, PI};
use crate::core::geometry::{vec3_dot_vec3f, Normal3f, Point3f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::medium::Medium;
use crate::core::primitive::{DirectionSample, PositionSample, Primitive};
use crate::core::reflection::Bsdf;
use crate::core::sampler::Sampler;

/// Sphere with outward facing normals. Typically carries a
/// `NullBsdf` and an interior medium to describe a cloud of fog.
pub struct Sphere {
    pub center: Point3f,
    pub radius: Float,
    pub bsdf: Arc<dyn Bsdf>,
    pub emission: Option<Spectrum>,
    pub int_medium: Option<Arc<dyn Medium>>,
    pub ext_medium: Option<Arc<dyn Medium>>,
}

impl Sphere {
    pub fn new(center: Point3f, radius: Float, bsdf: Arc<dyn Bsdf>) -> Self {
        Sphere {
            center,
            radius,
            bsdf,
            emission: None,
            int_medium: None,
            ext_medium: None,
        }
    }
    pub fn with_emission(mut self, emission: Spectrum) -> Self {
        self.emission = Some(emission);
        self
    }
    pub fn with_media(
        mut self,
        int_medium: Option<Arc<dyn Medium>>,
        ext_medium: Option<Arc<dyn Medium>>,
    ) -> Self {
        self.int_medium = int_medium;
        self.ext_medium = ext_medium;
        self
    }
}

impl Primitive for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction<'_>> {
        // compute quadratic sphere coefficients
        let o: Vector3f = ray.o - self.center;
        let a: Float = ray.d.length_squared();
        let b: Float = 2.0 as Float * vec3_dot_vec3f(&ray.d, &o);
        let c: Float = o.length_squared() - self.radius * self.radius;
        // solve quadratic equation for _t_ values
        let (t0, t1) = quadratic(a, b, c)?;
        // check quadric shape _t0_ and _t1_ for nearest intersection
        let t: Float = if t0 > ray.t_min && t0 <= ray.t_max {
            t0
        } else if t1 > ray.t_min && t1 <= ray.t_max {
            t1
        } else {
            return None;
        };
        let p: Point3f = ray.position(t);
        let n: Normal3f = Normal3f::from((p - self.center) / self.radius);
        Some(SurfaceInteraction {
            p,
            t,
            ng: n,
            ns: n,
            w: ray.d,
            epsilon: DEFAULT_EPSILON * (1.0 as Float).max(self.radius),
            bsdf: self.bsdf.as_ref(),
            primitive: self,
        })
    }
    fn is_emissive(&self) -> bool {
        self.emission.is_some()
    }
    /// Emissive spheres are only seen by camera paths.
    fn is_samplable(&self) -> bool {
        false
    }
    fn eval_direct(&self, isect: &SurfaceInteraction) -> Spectrum {
        match self.emission {
            Some(emission) if vec3_dot_vec3f(&isect.w, &Vector3f::from(isect.ng)) < 0.0 => {
                emission
            }
            _ => Spectrum::default(),
        }
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
        match self.emission {
            Some(emission) => emission.average() * 4.0 * PI * PI * self.radius * self.radius,
            None => 0.0 as Float,
        }
    }
    fn int_medium(&self) -> Option<&dyn Medium> {
        self.int_medium.as_deref()
    }
    fn ext_medium(&self) -> Option<&dyn Medium> {
        self.ext_medium.as_deref()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::materials::null::NullBsdf;

    #[test]
    fn hits_from_outside_and_inside() {
        let sphere = Sphere::new(Point3f::default(), 1.0, Arc::new(NullBsdf::default()));
        let outside = Ray::new(Point3f::new(0.0, 0.0, -3.0), Vector3f::new(0.0, 0.0, 1.0));
        let isect = sphere.intersect(&outside).unwrap();
        assert!((isect.t - 2.0).abs() < 1e-5);
        assert!((isect.ng.z + 1.0).abs() < 1e-5);
        let inside = Ray::new(Point3f::default(), Vector3f::new(0.0, 1.0, 0.0));
        let isect = sphere.intersect(&inside).unwrap();
        assert!((isect.t - 1.0).abs() < 1e-5);
        assert!((isect.ng.y - 1.0).abs() < 1e-5);
        let miss = Ray::new(Point3f::new(0.0, 2.0, -3.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(sphere.intersect(&miss).is_none());
    }
}
