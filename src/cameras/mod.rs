//! Cameras start the paths of the gather estimator.
//!
//! - PinholeCamera

pub mod pinhole;
