//! Implementations of the **Sampler** trait.
//!
//! - RandomSampler
//!
//! ## Random Sampler
//!
//! The Random Sampler is using the random number generetor class
//! **RNG** based on an unpublished manuscript by O'Neill: A family of
//! simple fast space-efficient statistically good algorithms for
//! random number generation.

pub mod random;
