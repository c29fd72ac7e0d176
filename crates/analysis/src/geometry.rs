//! Vector and quaternion helpers
//!
//! Thin layer over `nalgebra` that keeps the tolerance rules of the HUD math:
//! values within `FUZZY_EPSILON` of zero count as zero, vectors already of unit
//! length are returned untouched, and degenerate inputs yield zero instead of NaN.

use nalgebra::{Quaternion, Vector3};

pub type Vec3 = Vector3<f64>;
pub type Quat = Quaternion<f64>;

/// Absolute tolerance for "numerically zero"
pub const FUZZY_EPSILON: f64 = 1e-12;

pub fn fuzzy_is_null(x: f64) -> bool {
    x.abs() <= FUZZY_EPSILON
}

pub fn deg2rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

pub fn rad2deg(rad: f64) -> f64 {
    rad * 180.0 / std::f64::consts::PI
}

/// Build a vector from a `[x, y, z]` field
pub fn vec3(v: [f64; 3]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

/// Build a quaternion from a scalar-first `[w, x, y, z]` field
pub fn quat(wxyz: [f64; 4]) -> Quat {
    Quat::new(wxyz[0], wxyz[1], wxyz[2], wxyz[3])
}

/// Scalar-first components of `q`
pub fn quat_wxyz(q: &Quat) -> [f64; 4] {
    [q.w, q.i, q.j, q.k]
}

/// Unit vector, or zero for a (near) zero-length input
pub fn normalized(v: &Vec3) -> Vec3 {
    let len2 = v.norm_squared();
    if fuzzy_is_null(len2 - 1.0) {
        *v
    } else if !fuzzy_is_null(len2) {
        v / len2.sqrt()
    } else {
        Vec3::zeros()
    }
}

/// Unsigned angle between two vectors (radians)
///
/// The cosine is clamped so rounding never produces NaN for parallel inputs.
pub fn angle_between(a: &Vec3, b: &Vec3) -> f64 {
    let cos = a.dot(b) / (a.norm() * b.norm());
    cos.clamp(-1.0, 1.0).acos()
}

/// Unit quaternion, or zero for a (near) zero-length input
pub fn quat_normalized(q: &Quat) -> Quat {
    let len2 = q.norm_squared();
    if fuzzy_is_null(len2 - 1.0) {
        *q
    } else if !fuzzy_is_null(len2) {
        q / len2.sqrt()
    } else {
        Quat::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Multiplicative inverse, or zero for a (near) zero-length input
pub fn quat_inverse(q: &Quat) -> Quat {
    let len2 = q.norm_squared();
    if fuzzy_is_null(len2) {
        Quat::new(0.0, 0.0, 0.0, 0.0)
    } else {
        q.conjugate() / len2
    }
}

/// `q * (0, v) * conj(q)`
pub fn rotate(q: &Quat, v: &Vec3) -> Vec3 {
    let pure = Quat::from_imag(*v);
    (q * pure * q.conjugate()).imag()
}

/// Rotation of `degrees` about `axis`
pub fn quat_from_axis_angle(axis: &Vec3, degrees: f64) -> Quat {
    let half = deg2rad(degrees / 2.0);
    let ax = normalized(axis);
    let (s, c) = half.sin_cos();
    quat_normalized(&Quat::new(c, ax.x * s, ax.y * s, ax.z * s))
}

/// Shortest rotation taking direction `from` onto direction `to`
///
/// Antiparallel inputs rotate half a turn about an axis orthogonal to `from`:
/// `x × from`, or `y × from` when that is degenerate too.
pub fn rotation_between(from: &Vec3, to: &Vec3) -> Quat {
    let v0 = normalized(from);
    let v1 = normalized(to);
    let d = v0.dot(&v1) + 1.0;

    if fuzzy_is_null(d) {
        let mut axis = Vec3::x().cross(&v0);
        if fuzzy_is_null(axis.norm_squared()) {
            axis = Vec3::y().cross(&v0);
        }
        let axis = normalized(&axis);
        return Quat::new(0.0, axis.x, axis.y, axis.z);
    }

    let d = (2.0 * d).sqrt();
    let axis = v0.cross(&v1) / d;
    quat_normalized(&Quat::new(d * 0.5, axis.x, axis.y, axis.z))
}

/// Adjacent side from opposite side and angle (radians)
pub fn tri_opp2adj(opp: f64, angle: f64) -> f64 {
    opp / angle.tan()
}

/// Opposite side from hypotenuse and angle (radians)
pub fn tri_hyp2opp(hyp: f64, angle: f64) -> f64 {
    angle.sin() * hyp
}

/// Adjacent side from hypotenuse and angle (radians)
pub fn tri_hyp2adj(hyp: f64, angle: f64) -> f64 {
    angle.cos() * hyp
}
