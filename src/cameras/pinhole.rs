// std
use std::sync::Arc;
// pbrt
use crate::core::camera::Camera;
use crate::core::common::{radians, Float, Spectrum};
use crate::core::geometry::{vec3_cross_vec3, Point2i, Point3f, Vector3f};
use crate::core::medium::Medium;
use crate::core::primitive::{DirectionSample, PositionSample};
use crate::core::sampler::Sampler;

/// Ideal pinhole camera looking from `eye` towards a target point.
pub struct PinholeCamera {
    pub eye: Point3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    /// tangent of half the vertical field of view
    tan_half_fov: Float,
    pub resolution: Point2i,
    pub medium: Option<Arc<dyn Medium>>,
}

impl PinholeCamera {
    pub fn look_at(
        eye: Point3f,
        target: Point3f,
        up: Vector3f,
        fov: Float,
        resolution: Point2i,
    ) -> Self {
        let forward: Vector3f = (target - eye).normalize();
        let right: Vector3f = vec3_cross_vec3(&forward, &up).normalize();
        let up: Vector3f = vec3_cross_vec3(&right, &forward);
        PinholeCamera {
            eye,
            forward,
            right,
            up,
            tan_half_fov: (radians(fov) * 0.5 as Float).tan(),
            resolution,
            medium: None,
        }
    }
    pub fn with_medium(mut self, medium: Option<Arc<dyn Medium>>) -> Self {
        self.medium = medium;
        self
    }
}

impl Camera for PinholeCamera {
    fn sample_position(&self, _sampler: &mut dyn Sampler) -> Option<PositionSample> {
        Some(PositionSample {
            p: self.eye,
            ng: Default::default(),
            weight: Spectrum::new(1.0 as Float),
            pdf: 1.0 as Float,
        })
    }
    fn sample_direction(
        &self,
        sampler: &mut dyn Sampler,
        _point: &PositionSample,
        pixel: Point2i,
    ) -> Option<DirectionSample> {
        if pixel.x < 0
            || pixel.y < 0
            || pixel.x >= self.resolution.x
            || pixel.y >= self.resolution.y
        {
            return None;
        }
        // jittered position on the image plane in [-1, 1]
        let u = sampler.get_2d();
        let res_x: Float = self.resolution.x as Float;
        let res_y: Float = self.resolution.y as Float;
        let sx: Float = 2.0 as Float * (pixel.x as Float + u.x) / res_x - 1.0 as Float;
        let sy: Float = 1.0 as Float - 2.0 as Float * (pixel.y as Float + u.y) / res_y;
        let aspect: Float = res_x / res_y;
        let d: Vector3f = self.forward
            + self.right * (sx * self.tan_half_fov * aspect)
            + self.up * (sy * self.tan_half_fov);
        Some(DirectionSample {
            d: d.normalize(),
            weight: Spectrum::new(1.0 as Float),
            pdf: 1.0 as Float,
        })
    }
    fn medium(&self) -> Option<&dyn Medium> {
        self.medium.as_deref()
    }
    fn resolution(&self) -> Point2i {
        self.resolution
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::samplers::random::RandomSampler;

    #[test]
    fn centre_pixel_looks_at_target() {
        let camera = PinholeCamera::look_at(
            Point3f::new(0.0, 2.0, 0.0),
            Point3f::default(),
            Vector3f::new(0.0, 0.0, 1.0),
            10.0,
            Point2i { x: 1, y: 1 },
        );
        let mut sampler = RandomSampler::new(1);
        let point = camera.sample_position(&mut sampler).unwrap();
        for _ in 0..100 {
            let direction = camera
                .sample_direction(&mut sampler, &point, Point2i { x: 0, y: 0 })
                .unwrap();
            // the pixel corners are about 7 degrees off straight down
            assert!(direction.d.y < -(radians(8.0).cos()));
        }
        assert!(camera
            .sample_direction(&mut sampler, &point, Point2i { x: 1, y: 0 })
            .is_none());
    }
}
