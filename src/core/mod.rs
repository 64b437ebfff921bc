//! Types shared by the tracers and the contracts of their
//! collaborators.
//!
//! - common, geometry, spectrum: math and color
//! - rng, sampler, sampling: the sample stream and warping functions
//! - reflection, medium, primitive, camera, interaction, scene: what
//!   the tracers query
//! - photon, settings, integrator: photon records, configuration and
//!   the scattering steps shared by both passes

pub mod camera;
pub mod common;
pub mod geometry;
pub mod integrator;
pub mod interaction;
pub mod medium;
pub mod photon;
pub mod primitive;
pub mod reflection;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod scene;
pub mod settings;
pub mod spectrum;
