//! Surface scattering models. The photon tracers only see the
//! [`Bsdf`](crate::core::reflection::Bsdf) trait; these are the models
//! the demo scenes and the tests are built from.
//!
//! - LambertBsdf
//! - MirrorBsdf
//! - NullBsdf

pub mod matte;
pub mod mirror;
pub mod null;
