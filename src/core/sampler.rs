//! The **Sampler** trait is the per-invocation sample stream consumed
//! by the tracers and their collaborators. Every tracer instance owns
//! its own sampler; reproducibility comes from the caller assigning a
//! fixed seed per task.

// pbrt
use crate::core::common::Float;
use crate::core::geometry::Point2f;

pub trait Sampler {
    /// Uniform sample in [0, 1).
    fn get_1d(&mut self) -> Float;
    /// Two uniform samples in [0, 1).
    fn get_2d(&mut self) -> Point2f {
        let x: Float = self.get_1d();
        let y: Float = self.get_1d();
        Point2f { x, y }
    }
    /// Returns true with probability *p*.
    fn next_boolean(&mut self, p: Float) -> bool {
        if p <= 0.0 as Float {
            return false;
        }
        if p >= 1.0 as Float {
            return true;
        }
        self.get_1d() < p
    }
    /// Uniformly picks one of *n* choices.
    fn next_discrete(&mut self, n: usize) -> usize {
        ((self.get_1d() * n as Float) as usize).min(n.saturating_sub(1))
    }
}
