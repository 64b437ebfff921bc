//! Type definitions of Float and Spectrum, otherwise constants and
//! functions which are shared by the photon tracer and its
//! collaborators.

// pbrt
use crate::core::spectrum::RGBSpectrum;

pub type Spectrum = RGBSpectrum;

pub type Float = f32;

pub const PI: Float = std::f32::consts::PI;
pub const INV_PI: Float = 0.318_309_886_183_790_671_54;
pub const INV_2_PI: Float = 0.159_154_943_091_895_335_77;
pub const INV_4_PI: Float = 0.079_577_471_545_947_667_88;
pub const PI_OVER_2: Float = 1.570_796_326_794_896_619_23;
pub const PI_OVER_4: Float = 0.785_398_163_397_448_309_61;
/// Offset used to continue rays from a surface hit.
pub const DEFAULT_EPSILON: Float = 5e-4;

/// Clamp the given value *val* to lie between the values *low* and *high*.
pub fn clamp_t<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

/// Interpolate linearly between two provided values.
pub fn lerp<S, T>(t: S, a: T, b: T) -> T
where
    S: num::One,
    S: std::ops::Sub<S, Output = S>,
    S: Copy,
    T: std::ops::Add<T, Output = T>,
    T: std::ops::Mul<S, Output = T>,
{
    let one: S = num::One::one();
    a * (one - t) + b * t
}

/// Convert from angles expressed in degrees to radians.
pub fn radians(deg: Float) -> Float {
    (PI / 180.0) * deg
}

/// Square of a value, used all over the density estimators.
#[inline]
pub fn sqr(x: Float) -> Float {
    x * x
}

/// Find solution(s) of the quadratic equation at<sup>2</sup> + bt + c = 0.
pub fn quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    // find quadratic discriminant
    let discrim: f64 = (b as f64) * (b as f64) - 4.0 * (a as f64) * (c as f64);
    if discrim < 0.0 || a == 0.0 as Float {
        return None;
    }
    let root_discrim: f64 = discrim.sqrt();
    // compute quadratic _t_ values
    let q: f64 = if b < 0.0 {
        -0.5 * (b as f64 - root_discrim)
    } else {
        -0.5 * (b as f64 + root_discrim)
    };
    let mut t0: Float = (q / a as f64) as Float;
    let mut t1: Float = (c as f64 / q) as Float;
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }
    Some((t0, t1))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn quadratic_returns_sorted_roots() {
        // (t - 1)(t - 3) = t^2 - 4t + 3
        let (t0, t1) = quadratic(1.0, -4.0, 3.0).unwrap();
        assert!((t0 - 1.0).abs() < 1e-5);
        assert!((t1 - 3.0).abs() < 1e-5);
        assert!(quadratic(1.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn clamp_and_lerp() {
        assert_eq!(clamp_t(5.0 as Float, 0.0, 1.0), 1.0);
        assert_eq!(clamp_t(-5, 0, 10), 0);
        assert!((lerp(0.25 as Float, 0.0 as Float, 4.0 as Float) - 1.0).abs() < 1e-6);
    }
}
