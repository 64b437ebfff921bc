// pbrt
use crate::core::common::{Float, Spectrum};
use crate::core::geometry::{Point3f, Ray};
use crate::core::medium::{HenyeyGreenstein, Medium, MediumSample, MediumState, PhaseFunction};
use crate::core::sampler::Sampler;

/// Medium with constant absorption and scattering coefficients.
/// Free-flight distances are sampled from one randomly picked color
/// channel and weighted by the average over all channels.
pub struct HomogeneousMedium {
    pub sigma_a: Spectrum,
    pub sigma_s: Spectrum,
    pub sigma_t: Spectrum,
    pub phase: HenyeyGreenstein,
    /// scattering events allowed inside the medium before it turns
    /// opaque to further sampling
    pub max_bounce: u32,
}

impl HomogeneousMedium {
    pub fn new(sigma_a: &Spectrum, sigma_s: &Spectrum, g: Float) -> Self {
        HomogeneousMedium {
            sigma_a: *sigma_a,
            sigma_s: *sigma_s,
            sigma_t: *sigma_s + *sigma_a,
            phase: HenyeyGreenstein::new(g),
            max_bounce: 1024,
        }
    }
    fn transmittance_over(&self, distance: Float) -> Spectrum {
        if distance.is_infinite() {
            return Spectrum::default();
        }
        (-self.sigma_t * distance).exp()
    }
}

impl Medium for HomogeneousMedium {
    fn sample_distance(
        &self,
        sampler: &mut dyn Sampler,
        ray: &Ray,
        state: &mut MediumState,
    ) -> Option<MediumSample<'_>> {
        if state.bounce > self.max_bounce {
            return None;
        }
        // sample a channel and distance along the ray
        let channel: usize = sampler.next_discrete(3);
        let dist: Float = -(1.0 as Float - sampler.get_1d()).ln() / self.sigma_t[channel];
        let max_dist: Float = ray.t_max - ray.t_min;
        let exited: bool = dist >= max_dist;
        if exited && max_dist.is_infinite() {
            // nothing to scatter off and no boundary to stop at
            return None;
        }
        let d: Float = dist.min(max_dist);
        let mut weight: Spectrum = self.transmittance_over(d);
        let pdf: Float = if exited {
            weight.average()
        } else {
            let pdf: Float = (self.sigma_t * weight).average();
            weight *= self.sigma_s;
            pdf
        };
        if pdf <= 0.0 as Float {
            return None;
        }
        weight = weight / pdf;
        state.advance();
        let t: Float = ray.t_min + d;
        Some(MediumSample {
            p: ray.position(t),
            t,
            weight,
            pdf,
            exited,
            phase: &self.phase,
        })
    }
    fn transmittance(&self, _sampler: &mut dyn Sampler, ray: &Ray) -> Spectrum {
        self.transmittance_over(ray.t_max - ray.t_min)
    }
    fn phase_function(&self, _p: &Point3f) -> &dyn PhaseFunction {
        &self.phase
    }
    fn sigma_t(&self, _p: &Point3f) -> Spectrum {
        self.sigma_t
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::Vector3f;
    use crate::samplers::random::RandomSampler;

    fn segment(length: Float) -> Ray {
        let mut ray = Ray::new(Point3f::default(), Vector3f::new(0.0, 0.0, 1.0));
        ray.t_max = length;
        ray
    }

    #[test]
    fn transmittance_is_beer_lambert() {
        let medium = HomogeneousMedium::new(&Spectrum::new(0.5), &Spectrum::new(0.5), 0.0);
        let mut sampler = RandomSampler::new(1);
        let tr = medium.transmittance(&mut sampler, &segment(2.0));
        assert!((tr[0] - (-2.0 as Float).exp()).abs() < 1e-5);
        let infinite = Ray::new(Point3f::default(), Vector3f::new(0.0, 0.0, 1.0));
        assert!(medium.transmittance(&mut sampler, &infinite).is_black());
    }

    #[test]
    fn distance_sampling_weights() {
        // grey medium: exits carry weight one, scattering events the
        // single scattering albedo
        let sigma_s: Float = 0.3;
        let medium = HomogeneousMedium::new(&Spectrum::new(0.2), &Spectrum::new(sigma_s), 0.0);
        let mut sampler = RandomSampler::new(5);
        let ray = segment(1.5);
        let n = 50_000;
        let mut exit_weight: Float = 0.0;
        let mut exits = 0;
        for _ in 0..n {
            let mut state = MediumState::default();
            let sample = medium
                .sample_distance(&mut sampler, &ray, &mut state)
                .unwrap();
            assert!(sample.t >= ray.t_min && sample.t <= ray.t_max);
            assert_eq!(state.bounce, 1);
            if sample.exited {
                exits += 1;
                exit_weight += sample.weight[0];
                assert!((sample.weight[0] - 1.0).abs() < 1e-4);
            } else {
                // sigma_s / sigma_t
                assert!((sample.weight[0] - 0.6).abs() < 1e-4);
            }
        }
        let exit_probability = exits as Float / n as Float;
        assert!((exit_probability - (-0.75 as Float).exp()).abs() < 0.01);
        assert!(exit_weight > 0.0);
    }

    #[test]
    fn scatter_cap_stops_sampling() {
        let mut medium = HomogeneousMedium::new(&Spectrum::new(0.0), &Spectrum::new(1.0), 0.0);
        medium.max_bounce = 0;
        let mut sampler = RandomSampler::new(2);
        let mut state = MediumState::default();
        state.advance();
        assert!(medium
            .sample_distance(&mut sampler, &segment(1.0), &mut state)
            .is_none());
    }
}
