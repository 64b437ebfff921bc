//! # rs_photonmap
//!
//! Photon mapping light transport in the style of the [PBRT
//! book][book]'s renderer: an emission pass that traces paths from
//! the light sources and deposits photons on surfaces, inside
//! participating media and along the paths themselves, and a gather
//! pass that estimates the radiance seen by the camera from the
//! density of those photons.
//!
//! The two passes live in [`PhotonTracer`]. Scene, camera, BSDFs,
//! media and the photon indices are consumed through the traits in
//! [`core`] and [`accelerators`]; the remaining modules provide small
//! implementations of them.
//!
//! [book]: http://www.pbrt.org
//! [`PhotonTracer`]: integrators/photon_map/struct.PhotonTracer.html

#[macro_use] extern crate impl_ops;

pub mod accelerators;
pub mod cameras;
pub mod core;
pub mod integrators;
pub mod lights;
pub mod materials;
pub mod media;
pub mod samplers;
pub mod shapes;
