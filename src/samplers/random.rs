// pbrt
use crate::core::common::Float;
use crate::core::rng::Rng;
use crate::core::sampler::Sampler;

/// Independent uniform samples from a seeded PCG32 stream.
#[derive(Debug, Default, Clone)]
pub struct RandomSampler {
    pub rng: Rng,
}

impl RandomSampler {
    pub fn new(seed: u64) -> Self {
        RandomSampler {
            rng: Rng::new(seed),
        }
    }
    pub fn clone_with_seed(&self, seed: u64) -> Self {
        RandomSampler::new(seed)
    }
}

impl Sampler for RandomSampler {
    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }
}
