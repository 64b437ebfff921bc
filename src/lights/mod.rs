//! Light sources. Lights are primitives as well: the emission tracer
//! samples positions and directions on them, the gather estimator
//! evaluates their emission when a camera path reaches them.
//!
//! - PointLight
//! - InfiniteSphere
//!
//! Area lights are shapes with an emission value, see
//! [`Quad`](crate::shapes::quad::Quad).

pub mod infinite;
pub mod point;
