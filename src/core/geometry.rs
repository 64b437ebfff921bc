//! The geometric classes the photon tracer is built on: points,
//! vectors, normals, axis-aligned bounds and rays.
//!
//! A **point** is a location, a **vector** a direction or offset and a
//! **normal** is perpendicular to a surface. They share the same
//! representation but keep separate types, so that e.g. subtracting
//! two points yields a vector and adding a vector to a point yields a
//! point again.
//!
//! ```rust
//! use rs_photonmap::core::geometry::{Point3f, Vector3f};
//!
//!     let origin = Point3f::default();
//!     let up = Vector3f { x: 0.0, y: 1.0, z: 0.0 };
//!     let p: Point3f = origin + up * 2.0;
//!     assert_eq!(p.y, 2.0);
//! ```
//!
//! # Rays
//!
//! A **Ray** carries an origin, a direction and the valid parametric
//! interval `[t_min, t_max]`. Scene intersection shrinks `t_max` to
//! the nearest hit, so after a successful intersection
//! `ray.position(ray.t_max)` is the hit point. The `primary` flag
//! marks camera rays; it is a shading hint and never changes the
//! transport math.
//!
//! ```rust
//! use rs_photonmap::core::geometry::{Point3f, Ray, Vector3f};
//!
//!     let ray = Ray::new(
//!         Point3f { x: 0.0, y: 1.0, z: 0.0 },
//!         Vector3f { x: 0.0, y: -1.0, z: 0.0 },
//!     );
//!     assert_eq!(ray.t_min, 0.0);
//!     assert!(ray.t_max.is_infinite());
//! ```

// std
use std::ops;
use std::ops::{Index, IndexMut};
// others
use strum_macros::EnumIter;
// pbrt
use crate::core::common::Float;

#[derive(EnumIter, Debug, Copy, Clone, PartialEq)]
#[repr(u8)]
pub enum XYZEnum {
    X = 0,
    Y = 1,
    Z = 2,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point2f {
    pub x: Float,
    pub y: Float,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Point2i {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Vector3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Vector3f { x, y, z }
    }
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
    pub fn abs(&self) -> Vector3f {
        Vector3f {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    /// Compute a new vector pointing in the same direction but with unit
    /// length.
    pub fn normalize(&self) -> Vector3f {
        *self / self.length()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Point3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Point3f { x, y, z }
    }
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Normal3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Normal3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Normal3f { x, y, z }
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    /// Compute a new normal pointing in the same direction but with unit
    /// length.
    pub fn normalize(&self) -> Normal3f {
        *self / self.length()
    }
}

impl From<Normal3f> for Vector3f {
    fn from(n: Normal3f) -> Self {
        Vector3f {
            x: n.x,
            y: n.y,
            z: n.z,
        }
    }
}

impl From<Vector3f> for Normal3f {
    fn from(v: Vector3f) -> Self {
        Normal3f {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Point3f> for Vector3f {
    fn from(p: Point3f) -> Self {
        Vector3f {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl_op!(-|a: Vector3f| -> Vector3f {
    Vector3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op!(-|a: Normal3f| -> Normal3f {
    Normal3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op_ex!(+|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(+|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Point3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(*|a: &Vector3f, b: Float| -> Vector3f {
    Vector3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(/|a: &Vector3f, b: Float| -> Vector3f {
    assert_ne!(b, 0.0 as Float);
    let inv: Float = 1.0 as Float / b;
    Vector3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op_ex!(*|a: &Normal3f, b: Float| -> Normal3f {
    Normal3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(/|a: &Normal3f, b: Float| -> Normal3f {
    assert_ne!(b, 0.0 as Float);
    let inv: Float = 1.0 as Float / b;
    Normal3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op!(+= |a: &mut Vector3f, b: Vector3f| {
    a.x += b.x;
    a.y += b.y;
    a.z += b.z;
});

impl_op!(*= |a: &mut Vector3f, b: Float| {
    a.x *= b;
    a.y *= b;
    a.z *= b;
});

impl Index<XYZEnum> for Vector3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            _ => &self.z,
        }
    }
}

impl Index<XYZEnum> for Point3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            _ => &self.z,
        }
    }
}

impl IndexMut<XYZEnum> for Point3f {
    fn index_mut(&mut self, index: XYZEnum) -> &mut Float {
        match index {
            XYZEnum::X => &mut self.x,
            XYZEnum::Y => &mut self.y,
            _ => &mut self.z,
        }
    }
}

/// Product of the Euclidean magnitudes of the two vectors and the
/// cosine of the angle between them.
pub fn vec3_dot_vec3f(v1: &Vector3f, v2: &Vector3f) -> Float {
    v1.x * v2.x + v1.y * v2.y + v1.z * v2.z
}

/// Product of the Euclidean magnitudes of a vector (and a normal) and
/// the cosine of the angle between them.
pub fn vec3_dot_nrmf(v1: &Vector3f, n2: &Normal3f) -> Float {
    v1.x * n2.x + v1.y * n2.y + v1.z * n2.z
}

/// Given two vectors in 3D, the cross product is a vector that is
/// perpendicular to both of them.
pub fn vec3_cross_vec3(v1: &Vector3f, v2: &Vector3f) -> Vector3f {
    let v1x: f64 = v1.x as f64;
    let v1y: f64 = v1.y as f64;
    let v1z: f64 = v1.z as f64;
    let v2x: f64 = v2.x as f64;
    let v2y: f64 = v2.y as f64;
    let v2z: f64 = v2.z as f64;
    Vector3f {
        x: ((v1y * v2z) - (v1z * v2y)) as Float,
        y: ((v1z * v2x) - (v1x * v2z)) as Float,
        z: ((v1x * v2y) - (v1y * v2x)) as Float,
    }
}

/// Return the index of the component with the largest value.
pub fn vec3_max_dimensionf(v: &Vector3f) -> XYZEnum {
    if v.x > v.y {
        if v.x > v.z {
            XYZEnum::X
        } else {
            XYZEnum::Z
        }
    } else if v.y > v.z {
        XYZEnum::Y
    } else {
        XYZEnum::Z
    }
}

/// Construct a local coordinate system given only a single 3D vector.
pub fn vec3_coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2: Vector3f = if v1.x.abs() > v1.y.abs() {
        Vector3f {
            x: -v1.z,
            y: 0.0 as Float,
            z: v1.x,
        } / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f {
            x: 0.0 as Float,
            y: v1.z,
            z: -v1.y,
        } / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3: Vector3f = vec3_cross_vec3(v1, &v2);
    (v2, v3)
}

/// The distance squared between two points is the length of the
/// vector between them squared.
pub fn pnt3_distance_squaredf(p1: &Point3f, p2: &Point3f) -> Float {
    (*p1 - *p2).length_squared()
}

#[derive(Debug, Copy, Clone)]
pub struct Bounds3f {
    pub p_min: Point3f,
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    fn default() -> Bounds3f {
        let min_num: Float = std::f32::MIN;
        let max_num: Float = std::f32::MAX;
        // an empty box, any union with a point makes it valid
        Bounds3f {
            p_min: Point3f {
                x: max_num,
                y: max_num,
                z: max_num,
            },
            p_max: Point3f {
                x: min_num,
                y: min_num,
                z: min_num,
            },
        }
    }
}

impl Bounds3f {
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Bounds3f {
            p_min: Point3f {
                x: p1.x.min(p2.x),
                y: p1.y.min(p2.y),
                z: p1.z.min(p2.z),
            },
            p_max: Point3f {
                x: p1.x.max(p2.x),
                y: p1.y.max(p2.y),
                z: p1.z.max(p2.z),
            },
        }
    }
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }
    pub fn surface_area(&self) -> Float {
        let d: Vector3f = self.diagonal();
        2.0 as Float * (d.x * d.y + d.x * d.z + d.y * d.z)
    }
    /// Returns the axis along which the box is widest.
    pub fn maximum_extent(&self) -> XYZEnum {
        vec3_max_dimensionf(&self.diagonal())
    }
    /// Continuous position of a point relative to the corners of the
    /// box, (0,0,0) at the minimum and (1,1,1) at the maximum corner.
    pub fn offset(&self, p: &Point3f) -> Vector3f {
        let mut o: Vector3f = *p - self.p_min;
        if self.p_max.x > self.p_min.x {
            o.x /= self.p_max.x - self.p_min.x;
        }
        if self.p_max.y > self.p_min.y {
            o.y /= self.p_max.y - self.p_min.y;
        }
        if self.p_max.z > self.p_min.z {
            o.z /= self.p_max.z - self.p_min.z;
        }
        o
    }
    /// Slab test; returns the parametric range of the ray inside the
    /// box, clipped to the ray's valid interval.
    pub fn intersect_p(&self, ray: &Ray) -> Option<(Float, Float)> {
        let mut t0: Float = ray.t_min;
        let mut t1: Float = ray.t_max;
        for (o, d, lo, hi) in [
            (ray.o.x, ray.d.x, self.p_min.x, self.p_max.x),
            (ray.o.y, ray.d.y, self.p_min.y, self.p_max.y),
            (ray.o.z, ray.d.z, self.p_min.z, self.p_max.z),
        ]
        .iter()
        {
            let inv_ray_dir: Float = 1.0 as Float / *d;
            let mut t_near: Float = (*lo - *o) * inv_ray_dir;
            let mut t_far: Float = (*hi - *o) * inv_ray_dir;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            // a NaN bound (ray parallel to and on a slab plane) keeps the old value
            if t_near > t0 {
                t0 = t_near;
            }
            if t_far < t1 {
                t1 = t_far;
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }
}

/// Given a bounding box and a point, the **bnd3_union_pnt3f()**
/// function returns a new bounding box that encompasses that point as
/// well as the original box.
pub fn bnd3_union_pnt3f(b: &Bounds3f, p: &Point3f) -> Bounds3f {
    Bounds3f {
        p_min: Point3f {
            x: b.p_min.x.min(p.x),
            y: b.p_min.y.min(p.y),
            z: b.p_min.z.min(p.z),
        },
        p_max: Point3f {
            x: b.p_max.x.max(p.x),
            y: b.p_max.y.max(p.y),
            z: b.p_max.z.max(p.z),
        },
    }
}

/// Construct a new box that bounds the space encompassed by two other
/// bounding boxes.
pub fn bnd3_union_bnd3f(b1: &Bounds3f, b2: &Bounds3f) -> Bounds3f {
    Bounds3f {
        p_min: Point3f {
            x: b1.p_min.x.min(b2.p_min.x),
            y: b1.p_min.y.min(b2.p_min.y),
            z: b1.p_min.z.min(b2.p_min.z),
        },
        p_max: Point3f {
            x: b1.p_max.x.max(b2.p_max.x),
            y: b1.p_max.y.max(b2.p_max.y),
            z: b1.p_max.z.max(b2.p_max.z),
        },
    }
}

/// Pads the bounding box by a constant factor in all dimensions.
pub fn bnd3_expand(b: &Bounds3f, delta: Float) -> Bounds3f {
    let d: Vector3f = Vector3f {
        x: delta,
        y: delta,
        z: delta,
    };
    Bounds3f::new(b.p_min - d, b.p_max + d)
}

#[derive(Debug, Copy, Clone)]
pub struct Ray {
    /// origin
    pub o: Point3f,
    /// direction
    pub d: Vector3f,
    /// start of the valid segment along the ray
    pub t_min: Float,
    /// limits the ray to a segment along its infinite extent
    pub t_max: Float,
    /// camera ray (shading hint only)
    pub primary: bool,
}

impl Default for Ray {
    fn default() -> Self {
        Ray {
            o: Point3f::default(),
            d: Vector3f::default(),
            t_min: 0.0 as Float,
            t_max: std::f32::INFINITY,
            primary: false,
        }
    }
}

impl Ray {
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Ray {
            o,
            d,
            ..Default::default()
        }
    }
    // Point3f operator()(Float t) const { return o + d * t; }
    pub fn position(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
    /// Continue the path from *p* into direction *d*; the new segment
    /// starts *near* units away from *p* and is unbounded.
    pub fn scatter(&self, p: &Point3f, d: &Vector3f, near: Float) -> Ray {
        Ray {
            o: *p,
            d: *d,
            t_min: near,
            t_max: std::f32::INFINITY,
            primary: self.primary,
        }
    }
    pub fn has_nans(&self) -> bool {
        self.o.has_nans() || self.d.has_nans()
    }
}
