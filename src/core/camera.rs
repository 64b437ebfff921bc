//! The abstract **Camera** defines the interface the gather estimator
//! uses to start a path: sample a point on the lens, then a direction
//! through a given pixel.

// pbrt
use crate::core::geometry::Point2i;
use crate::core::medium::Medium;
use crate::core::primitive::{DirectionSample, PositionSample};
use crate::core::sampler::Sampler;

pub trait Camera: Send + Sync {
    fn sample_position(&self, sampler: &mut dyn Sampler) -> Option<PositionSample>;
    fn sample_direction(
        &self,
        sampler: &mut dyn Sampler,
        point: &PositionSample,
        pixel: Point2i,
    ) -> Option<DirectionSample>;
    /// Medium the camera sits in, if any.
    fn medium(&self) -> Option<&dyn Medium>;
    fn resolution(&self) -> Point2i;
}
