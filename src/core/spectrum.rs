//! Photon power, throughput and radiance are all carried as RGB
//! triples. The tracer only needs a few reductions on them: the
//! average (used as a scalar probability), the maximum (used to detect
//! a collapsed throughput) and finiteness checks.

// std
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign, Neg, Sub};
// others
use num::Zero;
// pbrt
use crate::core::common::Float;

#[derive(Debug, Default, Copy, Clone)]
pub struct RGBSpectrum {
    pub c: [Float; 3],
}

impl RGBSpectrum {
    pub fn new(v: Float) -> Self {
        RGBSpectrum { c: [v, v, v] }
    }
    pub fn rgb(r: Float, g: Float, b: Float) -> RGBSpectrum {
        RGBSpectrum { c: [r, g, b] }
    }
    pub fn y(&self) -> Float {
        let y_weight: [Float; 3] = [0.212_671, 0.715_160, 0.072_169];
        y_weight[0] * self.c[0] + y_weight[1] * self.c[1] + y_weight[2] * self.c[2]
    }
    pub fn average(&self) -> Float {
        (self.c[0] + self.c[1] + self.c[2]) / 3.0 as Float
    }
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0 as Float)
    }
    pub fn max_component_value(&self) -> Float {
        self.c[0].max(self.c[1]).max(self.c[2])
    }
    pub fn min_component_value(&self) -> Float {
        self.c[0].min(self.c[1]).min(self.c[2])
    }
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }
    pub fn is_finite(&self) -> bool {
        self.c.iter().all(|v| v.is_finite())
    }
    pub fn exp(&self) -> RGBSpectrum {
        RGBSpectrum {
            c: [self.c[0].exp(), self.c[1].exp(), self.c[2].exp()],
        }
    }
}

impl PartialEq for RGBSpectrum {
    fn eq(&self, rhs: &RGBSpectrum) -> bool {
        self.c == rhs.c
    }
}

impl Add for RGBSpectrum {
    type Output = RGBSpectrum;
    fn add(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum {
            c: [
                self.c[0] + rhs.c[0],
                self.c[1] + rhs.c[1],
                self.c[2] + rhs.c[2],
            ],
        }
    }
}

impl AddAssign for RGBSpectrum {
    fn add_assign(&mut self, rhs: RGBSpectrum) {
        self.c[0] += rhs.c[0];
        self.c[1] += rhs.c[1];
        self.c[2] += rhs.c[2];
    }
}

impl Sub for RGBSpectrum {
    type Output = RGBSpectrum;
    fn sub(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum {
            c: [
                self.c[0] - rhs.c[0],
                self.c[1] - rhs.c[1],
                self.c[2] - rhs.c[2],
            ],
        }
    }
}

impl Neg for RGBSpectrum {
    type Output = RGBSpectrum;
    fn neg(self) -> RGBSpectrum {
        RGBSpectrum {
            c: [-self.c[0], -self.c[1], -self.c[2]],
        }
    }
}

impl Mul for RGBSpectrum {
    type Output = RGBSpectrum;
    fn mul(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum {
            c: [
                self.c[0] * rhs.c[0],
                self.c[1] * rhs.c[1],
                self.c[2] * rhs.c[2],
            ],
        }
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = RGBSpectrum;
    fn mul(self, rhs: Float) -> RGBSpectrum {
        RGBSpectrum {
            c: [self.c[0] * rhs, self.c[1] * rhs, self.c[2] * rhs],
        }
    }
}

impl MulAssign for RGBSpectrum {
    fn mul_assign(&mut self, rhs: RGBSpectrum) {
        self.c[0] *= rhs.c[0];
        self.c[1] *= rhs.c[1];
        self.c[2] *= rhs.c[2];
    }
}

impl MulAssign<Float> for RGBSpectrum {
    fn mul_assign(&mut self, rhs: Float) {
        self.c[0] *= rhs;
        self.c[1] *= rhs;
        self.c[2] *= rhs;
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = RGBSpectrum;
    fn div(self, rhs: Float) -> RGBSpectrum {
        assert_ne!(rhs, 0.0 as Float);
        let inv: Float = 1.0 as Float / rhs;
        RGBSpectrum {
            c: [self.c[0] * inv, self.c[1] * inv, self.c[2] * inv],
        }
    }
}

impl Zero for RGBSpectrum {
    fn zero() -> RGBSpectrum {
        RGBSpectrum::new(0.0 as Float)
    }
    fn is_zero(&self) -> bool {
        self.is_black()
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;
    fn index(&self, index: usize) -> &Float {
        match index {
            0 => &self.c[0],
            1 => &self.c[1],
            2 => &self.c[2],
            _ => panic!("Check failed: i >= 0 && i <= 2"),
        }
    }
}

impl IndexMut<usize> for RGBSpectrum {
    fn index_mut(&mut self, index: usize) -> &mut Float {
        match index {
            0 => &mut self.c[0],
            1 => &mut self.c[1],
            2 => &mut self.c[2],
            _ => panic!("Check failed: i >= 0 && i <= 2"),
        }
    }
}

impl From<Float> for RGBSpectrum {
    fn from(f: Float) -> Self {
        RGBSpectrum::new(f)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reductions() {
        let s = RGBSpectrum::rgb(0.5, 2.0, 0.5);
        assert_eq!(s.average(), 1.0);
        assert_eq!(s.max_component_value(), 2.0);
        assert_eq!(s.min_component_value(), 0.5);
        assert!(!s.is_black());
        assert!(RGBSpectrum::zero().is_black());
    }

    #[test]
    fn finiteness() {
        let mut s = RGBSpectrum::new(1.0);
        assert!(s.is_finite());
        s[1] = Float::NAN;
        assert!(s.has_nans());
        assert!(!s.is_finite());
        s[1] = Float::INFINITY;
        assert!(!s.has_nans());
        assert!(!s.is_finite());
    }
}
