//! Bounding volume hierarchy over photon beams. Every beam (a path
//! photon followed by the next vertex of the same path) is bounded by
//! the box around its segment, grown by the volume gather radius. The
//! tree is built with the surface area heuristic and flattened into a
//! depth-first array.

// others
use typed_arena::Arena;
// pbrt
use crate::accelerators::BeamLookup;
use crate::core::common::Float;
use crate::core::geometry::{bnd3_expand, bnd3_union_bnd3f, bnd3_union_pnt3f};
use crate::core::geometry::{Bounds3f, Point3f, Ray, XYZEnum};
use crate::core::photon::PathPhoton;

#[derive(Debug, Copy, Clone)]
pub struct BVHBeamInfo {
    path_index: usize,
    bounds: Bounds3f,
    centroid: Point3f,
}

impl BVHBeamInfo {
    pub fn new(path_index: usize, bounds: Bounds3f) -> Self {
        BVHBeamInfo {
            path_index,
            bounds,
            centroid: Point3f {
                x: 0.5 as Float * (bounds.p_min.x + bounds.p_max.x),
                y: 0.5 as Float * (bounds.p_min.y + bounds.p_max.y),
                z: 0.5 as Float * (bounds.p_min.z + bounds.p_max.z),
            },
        }
    }
}

#[derive(Debug)]
pub struct BVHBuildNode<'a> {
    pub bounds: Bounds3f,
    pub child1: Option<&'a BVHBuildNode<'a>>,
    pub child2: Option<&'a BVHBuildNode<'a>>,
    pub split_axis: XYZEnum,
    pub first_beam_offset: usize,
    pub n_beams: usize,
}

impl<'a> Default for BVHBuildNode<'a> {
    fn default() -> Self {
        BVHBuildNode {
            bounds: Bounds3f::default(),
            child1: None,
            child2: None,
            split_axis: XYZEnum::X,
            first_beam_offset: 0_usize,
            n_beams: 0_usize,
        }
    }
}

impl<'a> BVHBuildNode<'a> {
    pub fn init_leaf(&mut self, first: usize, n: usize, b: &Bounds3f) {
        self.first_beam_offset = first;
        self.n_beams = n;
        self.bounds = *b;
        self.child1 = None;
        self.child2 = None;
    }
    pub fn init_interior(
        &mut self,
        axis: XYZEnum,
        c0: &'a BVHBuildNode<'a>,
        c1: &'a BVHBuildNode<'a>,
    ) {
        self.n_beams = 0;
        self.bounds = bnd3_union_bnd3f(&c0.bounds, &c1.bounds);
        self.child1 = Some(c0);
        self.child2 = Some(c1);
        self.split_axis = axis;
    }
}

#[derive(Debug, Copy, Clone)]
struct BucketInfo {
    count: usize,
    bounds: Bounds3f,
}

impl Default for BucketInfo {
    fn default() -> Self {
        BucketInfo {
            count: 0_usize,
            bounds: Bounds3f::default(),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct LinearBVHNode {
    bounds: Bounds3f,
    // beams offset for leaves, second child offset for interior nodes
    offset: usize,
    n_beams: usize,
    axis: XYZEnum,
}

pub struct BeamBvh {
    max_beams_in_node: usize,
    /// (index of the starting path photon, beam bounds) in leaf order
    pub beams: Vec<(usize, Bounds3f)>,
    pub nodes: Vec<LinearBVHNode>,
}

impl BeamBvh {
    pub fn new(path_photons: &[PathPhoton], radius: Float, max_beams_in_node: usize) -> Self {
        let mut beam_info: Vec<BVHBeamInfo> = Vec::new();
        for (i, p0) in path_photons.iter().enumerate() {
            if p0.length <= 0.0 as Float {
                continue;
            }
            let p1: Point3f = p0.pos + p0.dir * p0.length;
            let bounds: Bounds3f = bnd3_expand(&Bounds3f::new(p0.pos, p1), radius);
            beam_info.push(BVHBeamInfo::new(i, bounds));
        }
        let mut bvh: BeamBvh = BeamBvh {
            max_beams_in_node: max_beams_in_node.max(1).min(255),
            beams: Vec::with_capacity(beam_info.len()),
            nodes: Vec::new(),
        };
        if beam_info.is_empty() {
            return bvh;
        }
        // build BVH tree for beams using _beam_info_
        let arena: Arena<BVHBuildNode> = Arena::with_capacity(2 * beam_info.len());
        let mut total_nodes: usize = 0;
        let n: usize = beam_info.len();
        let mut ordered_beams: Vec<(usize, Bounds3f)> = Vec::with_capacity(n);
        let root = bvh.recursive_build(
            &arena,
            &mut beam_info,
            0,
            n,
            &mut total_nodes,
            &mut ordered_beams,
        );
        bvh.beams = ordered_beams;
        // compute representation of depth-first traversal of BVH tree
        let mut nodes: Vec<LinearBVHNode> = Vec::with_capacity(total_nodes);
        BeamBvh::flatten_bvh_tree(root, &mut nodes);
        bvh.nodes = nodes;
        log::debug!(
            "beam BVH: {} beams, {} nodes",
            bvh.beams.len(),
            bvh.nodes.len()
        );
        bvh
    }
    fn make_leaf<'a>(
        node: &mut BVHBuildNode<'a>,
        beam_info: &[BVHBeamInfo],
        bounds: &Bounds3f,
        ordered_beams: &mut Vec<(usize, Bounds3f)>,
    ) {
        let first_beam_offset: usize = ordered_beams.len();
        for info in beam_info {
            ordered_beams.push((info.path_index, info.bounds));
        }
        node.init_leaf(first_beam_offset, beam_info.len(), bounds);
    }
    fn recursive_build<'a>(
        &self,
        arena: &'a Arena<BVHBuildNode<'a>>,
        beam_info: &mut Vec<BVHBeamInfo>,
        start: usize,
        end: usize,
        total_nodes: &mut usize,
        ordered_beams: &mut Vec<(usize, Bounds3f)>,
    ) -> &'a BVHBuildNode<'a> {
        assert_ne!(start, end);
        let node: &mut BVHBuildNode<'a> = arena.alloc(BVHBuildNode::default());
        *total_nodes += 1_usize;
        // compute bounds of all beams in BVH node
        let mut bounds: Bounds3f = Bounds3f::default();
        for info in &beam_info[start..end] {
            bounds = bnd3_union_bnd3f(&bounds, &info.bounds);
        }
        let n_beams: usize = end - start;
        if n_beams == 1 {
            BeamBvh::make_leaf(node, &beam_info[start..end], &bounds, ordered_beams);
            return node;
        }
        // compute bound of beam centroids, choose split dimension _dim_
        let mut centroid_bounds: Bounds3f = Bounds3f::default();
        for info in &beam_info[start..end] {
            centroid_bounds = bnd3_union_pnt3f(&centroid_bounds, &info.centroid);
        }
        let dim: XYZEnum = centroid_bounds.maximum_extent();
        if centroid_bounds.p_max[dim] == centroid_bounds.p_min[dim] {
            BeamBvh::make_leaf(node, &beam_info[start..end], &bounds, ordered_beams);
            return node;
        }
        // partition beams using the surface area heuristic
        let mut mid: usize;
        if n_beams <= 2 {
            mid = (start + end) / 2;
            if beam_info[end - 1].centroid[dim] < beam_info[start].centroid[dim] {
                beam_info.swap(start, end - 1);
            }
        } else {
            // allocate _BucketInfo_ for SAH partition buckets
            const N_BUCKETS: usize = 12;
            let mut buckets: [BucketInfo; N_BUCKETS] = [BucketInfo::default(); N_BUCKETS];
            let bucket_of = |info: &BVHBeamInfo| -> usize {
                let b: usize =
                    (N_BUCKETS as Float * centroid_bounds.offset(&info.centroid)[dim]) as usize;
                b.min(N_BUCKETS - 1)
            };
            // initialize _BucketInfo_ for SAH partition buckets
            for info in &beam_info[start..end] {
                let b: usize = bucket_of(info);
                buckets[b].count += 1;
                buckets[b].bounds = bnd3_union_bnd3f(&buckets[b].bounds, &info.bounds);
            }
            // compute costs for splitting after each bucket
            let mut cost: [Float; N_BUCKETS - 1] = [0.0; N_BUCKETS - 1];
            for (i, c) in cost.iter_mut().enumerate() {
                let mut b0: Bounds3f = Bounds3f::default();
                let mut b1: Bounds3f = Bounds3f::default();
                let mut count0: usize = 0;
                let mut count1: usize = 0;
                for bucket in buckets.iter().take(i + 1) {
                    b0 = bnd3_union_bnd3f(&b0, &bucket.bounds);
                    count0 += bucket.count;
                }
                for bucket in buckets.iter().skip(i + 1) {
                    b1 = bnd3_union_bnd3f(&b1, &bucket.bounds);
                    count1 += bucket.count;
                }
                let area0: Float = if count0 > 0 { b0.surface_area() } else { 0.0 };
                let area1: Float = if count1 > 0 { b1.surface_area() } else { 0.0 };
                *c = 1.0
                    + (count0 as Float * area0 + count1 as Float * area1) / bounds.surface_area();
            }
            // find bucket to split at that minimizes SAH metric
            let mut min_cost: Float = cost[0];
            let mut min_cost_split_bucket: usize = 0;
            for (i, c) in cost.iter().enumerate() {
                if *c < min_cost {
                    min_cost = *c;
                    min_cost_split_bucket = i;
                }
            }
            // either create leaf or split beams at selected SAH bucket
            let leaf_cost: Float = n_beams as Float;
            if n_beams > self.max_beams_in_node || min_cost < leaf_cost {
                let (left, right): (Vec<BVHBeamInfo>, Vec<BVHBeamInfo>) = beam_info[start..end]
                    .iter()
                    .partition(|info| bucket_of(*info) <= min_cost_split_bucket);
                mid = start + left.len();
                if left.is_empty() || right.is_empty() {
                    // degenerate split, fall back to the middle
                    mid = (start + end) / 2;
                    beam_info[start..end].select_nth_unstable_by(mid - start, |a, b| {
                        a.centroid[dim]
                            .partial_cmp(&b.centroid[dim])
                            .unwrap_or(std::cmp::Ordering::Equal)
                    });
                } else {
                    beam_info.splice(start..mid, left.iter().cloned());
                    beam_info.splice(mid..end, right.iter().cloned());
                }
            } else {
                BeamBvh::make_leaf(node, &beam_info[start..end], &bounds, ordered_beams);
                return node;
            }
        }
        let c0 = self.recursive_build(arena, beam_info, start, mid, total_nodes, ordered_beams);
        let c1 = self.recursive_build(arena, beam_info, mid, end, total_nodes, ordered_beams);
        node.init_interior(dim, c0, c1);
        node
    }
    fn flatten_bvh_tree<'a>(node: &BVHBuildNode<'a>, nodes: &mut Vec<LinearBVHNode>) -> usize {
        let my_offset: usize = nodes.len();
        nodes.push(LinearBVHNode {
            bounds: node.bounds,
            offset: node.first_beam_offset,
            n_beams: node.n_beams,
            axis: node.split_axis,
        });
        if node.n_beams == 0 {
            // interior
            if let (Some(child1), Some(child2)) = (node.child1, node.child2) {
                BeamBvh::flatten_bvh_tree(child1, nodes);
                let second_child_offset: usize = BeamBvh::flatten_bvh_tree(child2, nodes);
                nodes[my_offset].offset = second_child_offset;
            }
        }
        my_offset
    }
}

impl BeamLookup for BeamBvh {
    fn trace(&self, ray: &Ray, visitor: &mut dyn FnMut(&Ray, usize, &Bounds3f)) {
        if self.nodes.is_empty() {
            return;
        }
        let dir_is_neg: [bool; 3] = [
            ray.d.x < 0.0 as Float,
            ray.d.y < 0.0 as Float,
            ray.d.z < 0.0 as Float,
        ];
        // follow ray through BVH nodes to find beam candidates
        let mut nodes_to_visit: Vec<usize> = Vec::with_capacity(64);
        let mut current_node_index: usize = 0;
        loop {
            let node: &LinearBVHNode = &self.nodes[current_node_index];
            if node.bounds.intersect_p(ray).is_some() {
                if node.n_beams > 0 {
                    for (path_index, bounds) in &self.beams[node.offset..node.offset + node.n_beams]
                    {
                        if bounds.intersect_p(ray).is_some() {
                            visitor(ray, *path_index, bounds);
                        }
                    }
                    match nodes_to_visit.pop() {
                        Some(next) => current_node_index = next,
                        None => break,
                    }
                } else if dir_is_neg[node.axis as usize] {
                    // put far BVH node on stack, advance to near node
                    nodes_to_visit.push(current_node_index + 1);
                    current_node_index = node.offset;
                } else {
                    nodes_to_visit.push(node.offset);
                    current_node_index += 1;
                }
            } else {
                match nodes_to_visit.pop() {
                    Some(next) => current_node_index = next,
                    None => break,
                }
            }
        }
    }
}
