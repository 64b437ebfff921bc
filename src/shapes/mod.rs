//! Intersectable primitives. Each shape carries the BSDF of its
//! surface, an optional emission and the media on both of its sides,
//! so it implements the **Primitive** trait directly.
//!
//! - Quad
//! - Sphere

pub mod quad;
pub mod sphere;
