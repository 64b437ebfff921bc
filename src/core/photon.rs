//! Photon records deposited by the emission tracer and the bounded
//! output ranges they are written into.
//!
//! A **PhotonRange** wraps a caller-owned, pre-sized slice. Deposits
//! past its capacity are silently dropped; the estimators stay valid,
//! just sparser. Concurrent emission tasks get disjoint ranges, e.g.
//! through `chunks_mut()`:
//!
//! ```rust
//! use rs_photonmap::core::photon::{Photon, PhotonRange};
//!
//!     let mut storage: Vec<Photon> = vec![Photon::default(); 8];
//!     let ranges: Vec<PhotonRange<Photon>> = storage
//!         .chunks_mut(4)
//!         .map(PhotonRange::new)
//!         .collect();
//!     assert_eq!(ranges.len(), 2);
//!     assert_eq!(ranges[1].capacity(), 4);
//! ```

// pbrt
use crate::core::common::{Float, Spectrum};
use crate::core::geometry::{Point3f, Vector3f};

/// Photon stored on a surface. `dir` is the direction the photon was
/// travelling when it arrived.
#[derive(Debug, Default, Copy, Clone)]
pub struct Photon {
    pub pos: Point3f,
    pub dir: Vector3f,
    pub power: Spectrum,
    pub bounce: u32,
}

impl Photon {
    pub fn scale_power(&mut self, scale: Float) {
        self.power *= scale;
    }
}

/// Photon stored inside a medium. `radius_sq` is the squared kernel
/// radius; it is assigned by whoever builds the volume index.
#[derive(Debug, Default, Copy, Clone)]
pub struct VolumePhoton {
    pub pos: Point3f,
    pub dir: Vector3f,
    pub power: Spectrum,
    pub bounce: u32,
    pub radius_sq: Float,
}

impl VolumePhoton {
    pub fn scale_power(&mut self, scale: Float) {
        self.power *= scale;
    }
}

/// One vertex of a photon path. Consecutive vertices of the same path
/// form the beams of the beam estimator; `dir` and `length` describe
/// the beam that starts here (see [`link_path_beams`]).
#[derive(Debug, Default, Copy, Clone)]
pub struct PathPhoton {
    pub pos: Point3f,
    pub power: Spectrum,
    pub dir: Vector3f,
    pub length: Float,
    data: u32,
}

impl PathPhoton {
    pub fn set_path_info(&mut self, bounce: u32, on_specular: bool) {
        self.data = (bounce << 1) | (on_specular as u32);
    }
    pub fn bounce(&self) -> u32 {
        self.data >> 1
    }
    /// Vertex was reached through a specular surface scatter.
    pub fn on_specular(&self) -> bool {
        self.data & 1_u32 != 0_u32
    }
    pub fn scale_power(&mut self, scale: Float) {
        self.power *= scale;
    }
}

/// Fills in `dir` and `length` of every path vertex that is followed
/// by the next vertex of the same path. All other vertices get a zero
/// length and never form a beam.
pub fn link_path_beams(photons: &mut [PathPhoton]) {
    let n: usize = photons.len();
    for i in 0..n {
        let mut length: Float = 0.0 as Float;
        let mut dir: Vector3f = Vector3f::default();
        if i + 1 < n && photons[i + 1].bounce() == photons[i].bounce() + 1 {
            let offset: Vector3f = photons[i + 1].pos - photons[i].pos;
            let l: Float = offset.length();
            if l > 0.0 as Float && l.is_finite() {
                length = l;
                dir = offset / l;
            }
        }
        photons[i].dir = dir;
        photons[i].length = length;
    }
}

/// Bounded output sequence over a caller-owned slice. Never holds
/// more than `capacity()` entries.
#[derive(Debug)]
pub struct PhotonRange<'a, T> {
    photons: &'a mut [T],
    next: usize,
}

impl<'a, T> PhotonRange<'a, T> {
    pub fn new(photons: &'a mut [T]) -> Self {
        PhotonRange { photons, next: 0 }
    }
    /// Next free slot, or `None` once the range is full.
    pub fn add_photon(&mut self) -> Option<&mut T> {
        if self.full() {
            return None;
        }
        self.next += 1;
        Some(&mut self.photons[self.next - 1])
    }
    pub fn full(&self) -> bool {
        self.next >= self.photons.len()
    }
    pub fn len(&self) -> usize {
        self.next
    }
    pub fn is_empty(&self) -> bool {
        self.next == 0
    }
    pub fn capacity(&self) -> usize {
        self.photons.len()
    }
    /// The deposited photons.
    pub fn photons(&self) -> &[T] {
        &self.photons[..self.next]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn range_never_exceeds_capacity() {
        for capacity in 0..6 {
            for attempts in 0..10 {
                let mut storage = vec![Photon::default(); capacity];
                let mut range = PhotonRange::new(&mut storage);
                for i in 0..attempts {
                    if let Some(photon) = range.add_photon() {
                        photon.bounce = i as u32;
                    }
                }
                assert_eq!(range.len(), attempts.min(capacity));
                assert!(range.len() <= range.capacity());
                assert_eq!(range.full(), attempts >= capacity);
            }
        }
    }

    #[test]
    fn deposited_photons_keep_order() {
        let mut storage = vec![Photon::default(); 3];
        let mut range = PhotonRange::new(&mut storage);
        for i in 0..2 {
            range.add_photon().unwrap().bounce = i + 1;
        }
        let bounces: Vec<u32> = range.photons().iter().map(|p| p.bounce).collect();
        assert_eq!(bounces, vec![1, 2]);
    }

    #[test]
    fn path_info_packing() {
        let mut photon = PathPhoton::default();
        photon.set_path_info(5, true);
        assert_eq!(photon.bounce(), 5);
        assert!(photon.on_specular());
        photon.set_path_info(0, false);
        assert_eq!(photon.bounce(), 0);
        assert!(!photon.on_specular());
    }

    #[test]
    fn beams_link_consecutive_bounces_only() {
        let mut path = vec![PathPhoton::default(); 4];
        path[0].pos = Point3f::new(0.0, 1.0, 0.0);
        path[0].set_path_info(0, false);
        path[1].pos = Point3f::new(0.0, 0.0, 0.0);
        path[1].set_path_info(1, false);
        // a new path starts here
        path[2].pos = Point3f::new(5.0, 5.0, 5.0);
        path[2].set_path_info(0, false);
        path[3].pos = Point3f::new(5.0, 5.0, 8.0);
        path[3].set_path_info(1, false);
        link_path_beams(&mut path);
        assert!((path[0].length - 1.0).abs() < 1e-6);
        assert!((path[0].dir.y + 1.0).abs() < 1e-6);
        assert_eq!(path[1].length, 0.0);
        assert!((path[2].length - 3.0).abs() < 1e-6);
        assert_eq!(path[3].length, 0.0);
    }

    #[test]
    fn power_scaling() {
        let mut photon = VolumePhoton::default();
        photon.power = Spectrum::new(4.0);
        photon.scale_power(0.25);
        assert_eq!(photon.power, Spectrum::new(1.0));
    }
}
