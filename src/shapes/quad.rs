//! Parallelogram spanned by two edges from a base point. With an
//! emission value attached it becomes a one-sided diffuse area light
//! photons can be emitted from.

// std
use std::sync::Arc;
// pbrt
use crate::core::common::{Float, Spectrum, DEFAULT_EPSILON, PI};
use crate::core::geometry::{vec3_cross_vec3, vec3_dot_nrmf, vec3_dot_vec3f};
use crate::core::geometry::{Normal3f, Point3f, Ray, Vector3f};
use crate::core::interaction::{SurfaceInteraction, TangentFrame};
use crate::core::medium::Medium;
use crate::core::primitive::{DirectionSample, PositionSample, Primitive};
use crate::core::reflection::Bsdf;
use crate::core::sampler::Sampler;
use crate::core::sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere};

pub struct Quad {
    pub base: Point3f,
    pub edge0: Vector3f,
    pub edge1: Vector3f,
    pub n: Normal3f,
    pub bsdf: Arc<dyn Bsdf>,
    pub emission: Option<Spectrum>,
    pub int_medium: Option<Arc<dyn Medium>>,
    pub ext_medium: Option<Arc<dyn Medium>>,
    frame: TangentFrame,
    area: Float,
}

impl Quad {
    pub fn new(base: Point3f, edge0: Vector3f, edge1: Vector3f, bsdf: Arc<dyn Bsdf>) -> Self {
        let cross: Vector3f = vec3_cross_vec3(&edge0, &edge1);
        let area: Float = cross.length();
        let n: Normal3f = Normal3f::from(cross / area);
        Quad {
            base,
            edge0,
            edge1,
            n,
            bsdf,
            emission: None,
            int_medium: None,
            ext_medium: None,
            frame: TangentFrame::new(&n),
            area,
        }
    }
    /// Quad centred at `center`, facing along +y.
    pub fn horizontal(center: Point3f, half_size: Float, bsdf: Arc<dyn Bsdf>) -> Self {
        let base: Point3f = center + Vector3f::new(-half_size, 0.0, half_size);
        Quad::new(
            base,
            Vector3f::new(2.0 * half_size, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, -2.0 * half_size),
            bsdf,
        )
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
    pub fn area(&self) -> Float {
        self.area
    }
}

impl Primitive for Quad {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction<'_>> {
        let n_dot_d: Float = vec3_dot_nrmf(&ray.d, &self.n);
        if n_dot_d == 0.0 as Float {
            return None;
        }
        let t: Float = vec3_dot_nrmf(&(self.base - ray.o), &self.n) / n_dot_d;
        if !(t > ray.t_min && t <= ray.t_max) {
            return None;
        }
        let p: Point3f = ray.position(t);
        let q: Vector3f = p - self.base;
        let l0: Float = vec3_dot_vec3f(&q, &self.edge0) / self.edge0.length_squared();
        let l1: Float = vec3_dot_vec3f(&q, &self.edge1) / self.edge1.length_squared();
        if !(0.0..=1.0).contains(&l0) || !(0.0..=1.0).contains(&l1) {
            return None;
        }
        Some(SurfaceInteraction {
            p,
            t,
            ng: self.n,
            ns: self.n,
            w: ray.d,
            epsilon: DEFAULT_EPSILON,
            bsdf: self.bsdf.as_ref(),
            primitive: self,
        })
    }
    fn is_emissive(&self) -> bool {
        self.emission.is_some()
    }
    fn is_samplable(&self) -> bool {
        self.emission.is_some()
    }
    fn eval_direct(&self, isect: &SurfaceInteraction) -> Spectrum {
        match self.emission {
            // one-sided emitter
            Some(emission) if vec3_dot_nrmf(&isect.w, &self.n) < 0.0 as Float => emission,
            _ => Spectrum::default(),
        }
    }
    fn sample_position(&self, sampler: &mut dyn Sampler) -> Option<PositionSample> {
        let emission: Spectrum = self.emission?;
        let u = sampler.get_2d();
        Some(PositionSample {
            p: self.base + self.edge0 * u.x + self.edge1 * u.y,
            ng: self.n,
            weight: emission * (PI * self.area),
            pdf: 1.0 as Float / self.area,
        })
    }
    fn sample_direction(
        &self,
        sampler: &mut dyn Sampler,
        _point: &PositionSample,
    ) -> Option<DirectionSample> {
        let d: Vector3f = cosine_sample_hemisphere(&sampler.get_2d());
        if d.z <= 0.0 as Float {
            return None;
        }
        Some(DirectionSample {
            d: self.frame.to_global(&d),
            weight: Spectrum::new(1.0 as Float),
            pdf: cosine_hemisphere_pdf(d.z),
        })
    }
    fn approximate_power(&self) -> Float {
        match self.emission {
            Some(emission) => emission.average() * PI * self.area,
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
