//! Balanced kd-tree over photons, stored implicitly in one array: the
//! node of a range `[lo, hi)` is the median element at `lo + (hi -
//! lo) / 2`, splitting along the widest axis of the range.

// std
use std::cmp::Ordering;
// pbrt
use crate::accelerators::{PhotonLookup, VolumePhotonLookup};
use crate::core::common::Float;
use crate::core::geometry::{bnd3_expand, bnd3_union_bnd3f, bnd3_union_pnt3f};
use crate::core::geometry::{pnt3_distance_squaredf, vec3_dot_vec3f};
use crate::core::geometry::{Bounds3f, Point3f, Ray, Vector3f, XYZEnum};
use crate::core::photon::{PathPhoton, Photon, VolumePhoton};

pub trait PhotonPosition {
    fn position(&self) -> Point3f;
}

impl PhotonPosition for Photon {
    fn position(&self) -> Point3f {
        self.pos
    }
}

impl PhotonPosition for VolumePhoton {
    fn position(&self) -> Point3f {
        self.pos
    }
}

impl PhotonPosition for PathPhoton {
    fn position(&self) -> Point3f {
        self.pos
    }
}

/// How the kernel radius of every volume photon is chosen.
#[derive(Debug, Copy, Clone)]
pub enum VolumeRadius {
    Fixed(Float),
    /// distance to the `gather_count`-th neighbour, at most
    /// `max_radius`
    Adaptive {
        gather_count: usize,
        max_radius: Float,
    },
}

pub struct KdTree<T> {
    photons: Vec<T>,
    split_axis: Vec<XYZEnum>,
    /// per node bounds of the kernel spheres in its subtree (volume
    /// photons only)
    bounds: Vec<Bounds3f>,
}

struct KnnQuery<'b> {
    indices: &'b mut [usize],
    dist_sq: &'b mut [Float],
    count: usize,
    max_dist_sq: Float,
}

impl<'b> KnnQuery<'b> {
    fn full(&self) -> bool {
        self.count == self.indices.len()
    }
    fn bound(&self) -> Float {
        if self.full() {
            self.dist_sq[self.count - 1]
        } else {
            self.max_dist_sq
        }
    }
    fn insert(&mut self, index: usize, d: Float) {
        if self.full() {
            if d >= self.bound() {
                return;
            }
        } else if d > self.max_dist_sq {
            return;
        }
        let mut i: usize = if self.full() {
            self.count - 1
        } else {
            self.count += 1;
            self.count - 1
        };
        // keep entries sorted by increasing distance
        while i > 0 && self.dist_sq[i - 1] > d {
            self.dist_sq[i] = self.dist_sq[i - 1];
            self.indices[i] = self.indices[i - 1];
            i -= 1;
        }
        self.dist_sq[i] = d;
        self.indices[i] = index;
    }
}

impl<T: PhotonPosition> KdTree<T> {
    pub fn new(mut photons: Vec<T>) -> Self {
        let mut split_axis: Vec<XYZEnum> = vec![XYZEnum::X; photons.len()];
        KdTree::recursive_build(&mut photons[..], &mut split_axis[..]);
        KdTree {
            photons,
            split_axis,
            bounds: Vec::new(),
        }
    }
    fn recursive_build(photons: &mut [T], split_axis: &mut [XYZEnum]) {
        if photons.len() <= 1 {
            return;
        }
        // split along the widest axis of the photon positions
        let mut bounds: Bounds3f = Bounds3f::default();
        for photon in photons.iter() {
            bounds = bnd3_union_pnt3f(&bounds, &photon.position());
        }
        let axis: XYZEnum = bounds.maximum_extent();
        let mid: usize = photons.len() / 2;
        photons.select_nth_unstable_by(mid, |a, b| {
            a.position()[axis]
                .partial_cmp(&b.position()[axis])
                .unwrap_or(Ordering::Equal)
        });
        split_axis[mid] = axis;
        let (left, right) = photons.split_at_mut(mid);
        let (left_axis, right_axis) = split_axis.split_at_mut(mid);
        KdTree::recursive_build(left, left_axis);
        KdTree::recursive_build(&mut right[1..], &mut right_axis[1..]);
    }
    pub fn len(&self) -> usize {
        self.photons.len()
    }
    pub fn is_empty(&self) -> bool {
        self.photons.is_empty()
    }
    pub fn photons(&self) -> &[T] {
        &self.photons
    }
    fn nearest_recursive(&self, lo: usize, hi: usize, pos: &Point3f, query: &mut KnnQuery) {
        if lo >= hi {
            return;
        }
        let mid: usize = lo + (hi - lo) / 2;
        let p: Point3f = self.photons[mid].position();
        let axis: XYZEnum = self.split_axis[mid];
        let delta: Float = pos[axis] - p[axis];
        let (near, far) = if delta < 0.0 as Float {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };
        self.nearest_recursive(near.0, near.1, pos, query);
        query.insert(mid, pnt3_distance_squaredf(pos, &p));
        if delta * delta <= query.bound() {
            self.nearest_recursive(far.0, far.1, pos, query);
        }
    }
}

impl<T: PhotonPosition + Sync> PhotonLookup<T> for KdTree<T> {
    fn photon(&self, index: usize) -> &T {
        &self.photons[index]
    }
    fn nearest_neighbours(
        &self,
        pos: &Point3f,
        indices: &mut [usize],
        dist_sq: &mut [Float],
        max_dist: Float,
    ) -> usize {
        let k: usize = indices.len().min(dist_sq.len());
        if k == 0 {
            return 0;
        }
        let mut query: KnnQuery = KnnQuery {
            indices: &mut indices[..k],
            dist_sq: &mut dist_sq[..k],
            count: 0,
            max_dist_sq: max_dist * max_dist,
        };
        self.nearest_recursive(0, self.photons.len(), pos, &mut query);
        query.count
    }
}

impl KdTree<VolumePhoton> {
    /// Assigns the kernel radius of every volume photon and computes
    /// the per-node bounds used by `beam_query()`.
    pub fn build_volume_hierarchy(&mut self, radius: VolumeRadius) {
        match radius {
            VolumeRadius::Fixed(r) => {
                for photon in self.photons.iter_mut() {
                    photon.radius_sq = r * r;
                }
            }
            VolumeRadius::Adaptive {
                gather_count,
                max_radius,
            } => {
                let k: usize = gather_count.max(1);
                let mut indices: Vec<usize> = vec![0; k];
                let mut dist_sq: Vec<Float> = vec![0.0 as Float; k];
                let radii_sq: Vec<Float> = self
                    .photons
                    .iter()
                    .map(|photon| {
                        let count: usize = self.nearest_neighbours(
                            &photon.pos,
                            &mut indices,
                            &mut dist_sq,
                            max_radius,
                        );
                        if count == k {
                            dist_sq[count - 1]
                        } else {
                            max_radius * max_radius
                        }
                    })
                    .collect();
                for (photon, r_sq) in self.photons.iter_mut().zip(radii_sq) {
                    photon.radius_sq = r_sq;
                }
            }
        }
        self.bounds = vec![Bounds3f::default(); self.photons.len()];
        let n: usize = self.photons.len();
        self.compute_bounds(0, n);
        log::debug!("volume photon hierarchy over {} photons", n);
    }
    fn compute_bounds(&mut self, lo: usize, hi: usize) -> Bounds3f {
        if lo >= hi {
            return Bounds3f::default();
        }
        let mid: usize = lo + (hi - lo) / 2;
        let p: Point3f = self.photons[mid].pos;
        let r: Float = self.photons[mid].radius_sq.sqrt();
        let mut b: Bounds3f = bnd3_expand(&Bounds3f::new(p, p), r);
        let left: Bounds3f = self.compute_bounds(lo, mid);
        let right: Bounds3f = self.compute_bounds(mid + 1, hi);
        b = bnd3_union_bnd3f(&b, &left);
        b = bnd3_union_bnd3f(&b, &right);
        self.bounds[mid] = b;
        b
    }
    fn beam_query_recursive(
        &self,
        lo: usize,
        hi: usize,
        ray: &Ray,
        visitor: &mut dyn FnMut(&VolumePhoton, Float, Float),
    ) {
        if lo >= hi {
            return;
        }
        let mid: usize = lo + (hi - lo) / 2;
        if self.bounds[mid].intersect_p(ray).is_none() {
            return;
        }
        let photon: &VolumePhoton = &self.photons[mid];
        let delta: Vector3f = photon.pos - ray.o;
        let t: Float = vec3_dot_vec3f(&delta, &ray.d);
        if t >= ray.t_min && t <= ray.t_max {
            let dist_sq: Float = (delta - ray.d * t).length_squared();
            if dist_sq < photon.radius_sq {
                visitor(photon, t, dist_sq);
            }
        }
        self.beam_query_recursive(lo, mid, ray, visitor);
        self.beam_query_recursive(mid + 1, hi, ray, visitor);
    }
}

impl VolumePhotonLookup for KdTree<VolumePhoton> {
    fn beam_query(
        &self,
        pos: &Point3f,
        dir: &Vector3f,
        far_t: Float,
        visitor: &mut dyn FnMut(&VolumePhoton, Float, Float),
    ) {
        if self.bounds.len() != self.photons.len() {
            // hierarchy was never built, no photon has a radius
            return;
        }
        let mut ray: Ray = Ray::new(*pos, *dir);
        ray.t_max = far_t;
        self.beam_query_recursive(0, self.photons.len(), &ray, visitor);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::sampler::Sampler;
    use crate::samplers::random::RandomSampler;

    fn random_photons(n: usize, seed: u64) -> Vec<Photon> {
        let mut sampler = RandomSampler::new(seed);
        (0..n)
            .map(|i| {
                let mut photon = Photon::default();
                photon.pos = Point3f::new(sampler.get_1d(), sampler.get_1d(), sampler.get_1d());
                photon.bounce = i as u32;
                photon
            })
            .collect()
    }

    #[test]
    fn knn_matches_brute_force() {
        let photons = random_photons(500, 1);
        let tree = KdTree::new(photons.clone());
        let pos = Point3f::new(0.4, 0.5, 0.6);
        let mut indices = vec![0_usize; 20];
        let mut dist_sq = vec![0.0 as Float; 20];
        let count = tree.nearest_neighbours(&pos, &mut indices, &mut dist_sq, 10.0);
        assert_eq!(count, 20);
        let mut expected: Vec<Float> = photons
            .iter()
            .map(|p| pnt3_distance_squaredf(&pos, &p.pos))
            .collect();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for i in 0..count {
            assert!((dist_sq[i] - expected[i]).abs() < 1e-6);
            let p = tree.photon(indices[i]);
            assert!((pnt3_distance_squaredf(&pos, &p.pos) - dist_sq[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn knn_respects_count_and_radius() {
        let tree = KdTree::new(random_photons(1000, 2));
        let pos = Point3f::new(0.5, 0.5, 0.5);
        let mut indices = vec![0_usize; 50];
        let mut dist_sq = vec![0.0 as Float; 50];
        let radius: Float = 0.1;
        let count = tree.nearest_neighbours(&pos, &mut indices, &mut dist_sq, radius);
        assert!(count <= 50);
        for d in dist_sq.iter().take(count) {
            assert!(*d <= radius * radius);
        }
        let inside = tree
            .photons()
            .iter()
            .filter(|p| pnt3_distance_squaredf(&pos, &p.pos) <= radius * radius)
            .count();
        assert_eq!(count, inside.min(50));
    }

    #[test]
    fn empty_tree_finds_nothing() {
        let tree: KdTree<Photon> = KdTree::new(Vec::new());
        let mut indices = vec![0_usize; 4];
        let mut dist_sq = vec![0.0 as Float; 4];
        let count = tree.nearest_neighbours(&Point3f::default(), &mut indices, &mut dist_sq, 1e30);
        assert_eq!(count, 0);
    }

    #[test]
    fn beam_query_matches_brute_force() {
        let mut sampler = RandomSampler::new(3);
        let photons: Vec<VolumePhoton> = (0..400)
            .map(|_| {
                let mut photon = VolumePhoton::default();
                photon.pos = Point3f::new(sampler.get_1d(), sampler.get_1d(), sampler.get_1d());
                photon
            })
            .collect();
        let mut tree = KdTree::new(photons);
        tree.build_volume_hierarchy(VolumeRadius::Fixed(0.05));
        let pos = Point3f::new(-1.0, 0.5, 0.5);
        let dir = Vector3f::new(1.0, 0.0, 0.0);
        let mut found = 0;
        tree.beam_query(&pos, &dir, 1.7, &mut |photon, t, dist_sq| {
            assert!(t >= 0.0 && t <= 1.7);
            assert!(dist_sq < photon.radius_sq);
            found += 1;
        });
        let expected = tree
            .photons()
            .iter()
            .filter(|p| {
                let delta = p.pos - pos;
                let t = vec3_dot_vec3f(&delta, &dir);
                t >= 0.0 && t <= 1.7 && (delta - dir * t).length_squared() < p.radius_sq
            })
            .count();
        assert!(expected > 0);
        assert_eq!(found, expected);
    }

    #[test]
    fn adaptive_radius_uses_kth_neighbour() {
        let photons: Vec<VolumePhoton> = (0..4)
            .map(|i| {
                let mut photon = VolumePhoton::default();
                photon.pos = Point3f::new(i as Float, 0.0, 0.0);
                photon
            })
            .collect();
        let mut tree = KdTree::new(photons);
        tree.build_volume_hierarchy(VolumeRadius::Adaptive {
            gather_count: 2,
            max_radius: 10.0,
        });
        for photon in tree.photons() {
            // itself plus the closest neighbour one unit away
            assert!((photon.radius_sq - 1.0).abs() < 1e-6);
        }
    }
}
