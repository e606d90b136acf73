use std::ops::{Neg, Add, AddAssign, Sub, SubAssign, Mul, MulAssign, Div};
use std::f32::consts::PI;
use std::fmt;

use crate::random::Randf32;
use crate::vector::Vector;

/// A quaternion `w + xi + yj + zk`.
///
/// Unit quaternions represent rotations. Quaternions with `w == 0` carry a
/// plain 3D quantity through the sandwich product in
/// [`Quaternion::rotate_vector`].
///
/// Nothing here normalizes implicitly: operations that only make sense for
/// rotations ([`Quaternion::axis_angle`], [`Quaternion::rotate_vector`]) expect
/// the caller to pass a unit quaternion. `valid` has the same advisory meaning
/// as on [`Vector`].
#[derive(Clone, Copy, Debug)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub valid: bool,
}
impl Quaternion {
    /// No rotation.
    pub const IDENTITY: Quaternion = Quaternion::new(1.0, 0.0, 0.0, 0.0);

    /// Direct component assignment, no normalization.
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z, valid: true }
    }

    /// Pure quaternion with `w = 0`.
    pub const fn pure(x: f32, y: f32, z: f32) -> Self {
        Self::new(0.0, x, y, z)
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// `axis` does not need unit length. A zero axis yields
    /// [`Quaternion::IDENTITY`] whatever the angle.
    pub fn from_axis_angle(mut axis: Vector, angle: f32) -> Self {
        if axis.is_zero_vector() {
            log::trace!("from_axis_angle: zero axis, using identity");
            return Self::IDENTITY;
        }
        axis.normalize();

        let (sa, ca) = (angle / 2.0).sin_cos();
        Self {
            w: ca,
            x: axis.x * sa,
            y: axis.y * sa,
            z: axis.z * sa,
            valid: axis.valid,
        }
    }

    /// Random rotation about a uniformly chosen axis, angle in [-π, π).
    pub fn random_rotation(rand: &mut Randf32) -> Self {
        Self::from_axis_angle(Vector::random_unit_vec(rand), rand.next_in(-PI..PI))
    }

    pub fn copy(&self) -> Self {
        *self
    }

    /// Vector part, `w` dropped.
    pub fn to_vector(&self) -> Vector {
        Vector::new(self.x, self.y, self.z)
    }

    /// Negates the vector part in place. For a unit quaternion this is the inverse.
    pub fn conjugate(&mut self) -> &mut Self {
        self.x = -self.x;
        self.y = -self.y;
        self.z = -self.z;
        self
    }

    pub fn conjugated(&self) -> Self {
        let mut quat = *self;
        quat.conjugate();
        quat
    }

    /// Euclidean length, summed in f64 like [`Vector::len`].
    pub fn len(&self) -> f32 {
        self.len_sq_f64().sqrt() as f32
    }

    fn len_sq_f64(&self) -> f64 {
        let (w, x, y, z) = (self.w as f64, self.x as f64, self.y as f64, self.z as f64);
        w*w + x*x + y*y + z*z
    }

    pub fn len_sq(&self) -> f32 {
        self.w*self.w + self.x*self.x + self.y*self.y + self.z*self.z
    }

    /// Euclidean norm over all four components. NaN clears `valid`.
    pub fn magnitude(&mut self) -> f32 {
        let m = self.len();
        if m.is_nan() {
            log::debug!("quaternion magnitude is NaN ({}, {}, {}, {})", self.w, self.x, self.y, self.z);
            self.valid = false;
        }
        m
    }

    pub fn dot(&self, quat: Quaternion) -> f32 {
        self.w*quat.w + self.x*quat.x + self.y*quat.y + self.z*quat.z
    }

    /// Scales to unit length in place.
    ///
    /// With `sign` set and `w < 0` the whole quaternion is negated as well, so
    /// `w >= 0` afterwards. `q` and `-q` are the same rotation; this picks one
    /// representative of the pair. A zero quaternion is left as it is.
    pub fn normalize(&mut self, sign: bool) -> &mut Self {
        if self.magnitude() == 0.0 {
            log::trace!("normalize: zero quaternion left as zero");
            return self;
        }
        let mut m = self.len_sq_f64().sqrt();
        if sign && self.w < 0.0 {
            m = -m;
        }

        self.w = (self.w as f64 / m) as f32;
        self.x = (self.x as f64 / m) as f32;
        self.y = (self.y as f64 / m) as f32;
        self.z = (self.z as f64 / m) as f32;
        self
    }

    pub fn normalized(&self, sign: bool) -> Self {
        let mut quat = *self;
        quat.normalize(sign);
        quat
    }

    /// Multiplicative inverse, `conj(q) / |q|²`. The zero quaternion maps to itself.
    pub fn inverse(&self) -> Self {
        let len_sq = self.len_sq_f64();
        if len_sq == 0.0 {
            log::trace!("inverse: zero quaternion has no inverse, left as zero");
            return *self;
        }
        Self::new(
            (self.w as f64 / len_sq) as f32,
            (-self.x as f64 / len_sq) as f32,
            (-self.y as f64 / len_sq) as f32,
            (-self.z as f64 / len_sq) as f32,
        )
    }

    /// Rotation axis (unit length) and angle in radians, `angle = 2 acos(w)`.
    ///
    /// Assumes `self` is a unit quaternion. With no rotation the vector part is
    /// zero and so is the returned axis.
    pub fn axis_angle(&self) -> (Vector, f32) {
        let axis = self.to_vector().normalized();
        let angle = 2.0 * self.w.clamp(-1.0, 1.0).acos();
        (axis, angle)
    }

    /// Rotates `vec` with the sandwich product `q * v * conj(q)`.
    ///
    /// Only a rotation when `self` has unit length; otherwise the result is
    /// scaled by `|q|²`.
    pub fn rotate_vector(&self, vec: Vector) -> Vector {
        (*self * Quaternion::from(vec) * self.conjugated()).to_vector()
    }

    /// Renders `w: .., x: .., y: .., z: ..` with `digits` decimals.
    pub fn to_string_digits(&self, digits: usize) -> String {
        format!("{:.*}", digits, self)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for Quaternion {
    fn eq(&self, other: &Self) -> bool {
        self.w == other.w && self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl From<Vector> for Quaternion {
    fn from(vec: Vector) -> Self {
        Self::pure(vec.x, vec.y, vec.z)
    }
}

impl From<[f32; 4]> for Quaternion {
    fn from(arr: [f32; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }
}

impl From<Quaternion> for [f32; 4] {
    fn from(quat: Quaternion) -> Self {
        [quat.w, quat.x, quat.y, quat.z]
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.w, -self.x, -self.y, -self.z)
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.w + other.w, self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Quaternion {
    fn add_assign(&mut self, other: Self) {
        self.w += other.w;
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Quaternion {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.w - other.w, self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl SubAssign for Quaternion {
    fn sub_assign(&mut self, other: Self) {
        self.w -= other.w;
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;

    fn mul(self, other: f32) -> Self::Output {
        Self::new(self.w * other, self.x * other, self.y * other, self.z * other)
    }
}

impl MulAssign<f32> for Quaternion {
    fn mul_assign(&mut self, other: f32) {
        self.w *= other;
        self.x *= other;
        self.y *= other;
        self.z *= other;
    }
}

impl Div<f32> for Quaternion {
    type Output = Self;

    fn div(self, other: f32) -> Self::Output {
        Self::new(self.w / other, self.x / other, self.y / other, self.z / other)
    }
}

/// Hamilton product. For rotations `a * b` applies `b` first, then `a`.
impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, q: Self) -> Self::Output {
        Self::new(
            self.w*q.w - self.x*q.x - self.y*q.y - self.z*q.z,
            self.w*q.x + self.x*q.w + self.y*q.z - self.z*q.y,
            self.w*q.y - self.x*q.z + self.y*q.w + self.z*q.x,
            self.w*q.z + self.x*q.y - self.y*q.x + self.z*q.w,
        )
    }
}

impl MulAssign for Quaternion {
    fn mul_assign(&mut self, q: Self) {
        *self = *self * q;
    }
}

/// `w: <v>, x: <v>, y: <v>, z: <v>`, two decimals unless a precision is given.
impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f.precision().unwrap_or(2);
        write!(f, "w: {:.*}, x: {:.*}, y: {:.*}, z: {:.*}",
            digits, self.w,
            digits, self.x,
            digits, self.y,
            digits, self.z,
        )
    }
}


#[cfg(test)]
fn assert_vec_near(a: Vector, b: Vector, eps: f32) {
    approx::assert_abs_diff_eq!(a.x, b.x, epsilon = eps);
    approx::assert_abs_diff_eq!(a.y, b.y, epsilon = eps);
    approx::assert_abs_diff_eq!(a.z, b.z, epsilon = eps);
}

#[test]
fn hamilton_product_basis() {
    let i = Quaternion::pure(1.0, 0.0, 0.0);
    let j = Quaternion::pure(0.0, 1.0, 0.0);
    let k = Quaternion::pure(0.0, 0.0, 1.0);
    let minus_one = Quaternion::new(-1.0, 0.0, 0.0, 0.0);

    assert_eq!(i * j, k);
    assert_eq!(j * k, i);
    assert_eq!(k * i, j);
    assert_eq!(j * i, -k);
    assert_eq!(k * j, -i);
    assert_eq!(i * k, -j);
    assert_eq!(i * i, minus_one);
    assert_eq!(i * j * k, minus_one);
}

#[test]
fn hamilton_product_values() {
    let a = Quaternion::new(1.0, 2.0, 3.0, 4.0);
    let b = Quaternion::new(5.0, 6.0, 7.0, 8.0);

    assert_eq!(a * b, Quaternion::new(-60.0, 12.0, 30.0, 24.0));
    assert_eq!(b * a, Quaternion::new(-60.0, 20.0, 14.0, 32.0));

    let mut c = a;
    c *= b;
    assert_eq!(c, a * b);
}

#[test]
fn rotate_quarter_turn_about_z() {
    let q = Quaternion::from_axis_angle(Vector::new(0.0, 0.0, 1.0), PI / 2.0);
    let rotated = q.rotate_vector(Vector::new(1.0, 0.0, 0.0));

    assert_vec_near(rotated, Vector::new(0.0, 1.0, 0.0), 1e-6);
}

#[test]
fn zero_axis_gives_identity() {
    for angle in [0.0, 1.0, -3.0, PI, 100.0] {
        let q = Quaternion::from_axis_angle(Vector::zero(), angle);
        assert_eq!(q, Quaternion::new(1.0, 0.0, 0.0, 0.0));
        assert!(!q.w.is_nan());
        assert!(q.valid);
    }
}

#[test]
fn axis_is_normalized_on_construction() {
    let q = Quaternion::from_axis_angle(Vector::new(0.0, 5.0, 0.0), PI / 2.0);
    let s = (PI / 4.0).sin();

    approx::assert_relative_eq!(q.w, (PI / 4.0).cos());
    approx::assert_relative_eq!(q.y, s);
    assert_eq!(q.x, 0.0);
    assert_eq!(q.z, 0.0);
    approx::assert_relative_eq!(q.len(), 1.0, epsilon = 1e-6);
}

#[test]
fn zero_angle_rotation_is_identity() {
    let mut rand = Randf32::seed(3);
    for _ in 0..100 {
        let axis = Vector::random_in_range(&mut rand, -5.0..5.0);
        let v = Vector::random_in_range(&mut rand, -10.0..10.0);
        let q = Quaternion::from_axis_angle(axis, 0.0);

        assert_eq!(q.rotate_vector(v), v);
    }
}

#[test]
fn rotation_preserves_length() {
    let mut rand = Randf32::seed(5);
    for _ in 0..200 {
        let q = Quaternion::random_rotation(&mut rand);
        let v = Vector::random_in_range(&mut rand, -10.0..10.0);

        approx::assert_relative_eq!(q.rotate_vector(v).len(), v.len(), epsilon = 1e-4, max_relative = 1e-5);
    }
}

#[test]
fn composition_applies_right_operand_first() {
    let mut rand = Randf32::seed(9);
    for _ in 0..200 {
        let q1 = Quaternion::random_rotation(&mut rand);
        let q2 = Quaternion::random_rotation(&mut rand);
        let v = Vector::random_in_range(&mut rand, -10.0..10.0);

        assert_vec_near((q1 * q2).rotate_vector(v), q1.rotate_vector(q2.rotate_vector(v)), 1e-4);
    }

    let about_z = Quaternion::from_axis_angle(Vector::new(0.0, 0.0, 1.0), PI / 2.0);
    let about_x = Quaternion::from_axis_angle(Vector::new(1.0, 0.0, 0.0), PI / 2.0);
    let v = Vector::new(1.0, 0.0, 0.0);

    // x -> y about z, then y -> z about x
    assert_vec_near((about_x * about_z).rotate_vector(v), Vector::new(0.0, 0.0, 1.0), 1e-6);
    // x stays put about x, then x -> y about z
    assert_vec_near((about_z * about_x).rotate_vector(v), Vector::new(0.0, 1.0, 0.0), 1e-6);
}

#[test]
fn axis_angle_round_trip() {
    let mut rand = Randf32::seed(13);
    for _ in 0..200 {
        let axis = Vector::random_unit_vec(&mut rand);
        let angle = rand.next_in(0.01..(2.0 * PI - 0.01));

        let (out_axis, out_angle) = Quaternion::from_axis_angle(axis, angle).axis_angle();

        approx::assert_abs_diff_eq!(out_angle, angle, epsilon = 1e-3);
        assert_vec_near(out_axis, axis, 1e-3);
    }
}

#[test]
fn axis_angle_negative_angle_flips_axis() {
    let axis = Vector::new(0.0, 1.0, 0.0);
    let (out_axis, out_angle) = Quaternion::from_axis_angle(axis, -1.0).axis_angle();

    approx::assert_relative_eq!(out_angle, 1.0, epsilon = 1e-5);
    assert_vec_near(out_axis, -axis, 1e-6);
}

#[test]
fn axis_angle_of_identity_is_degenerate_but_finite() {
    let (axis, angle) = Quaternion::IDENTITY.axis_angle();
    assert_eq!(axis, Vector::zero());
    assert_eq!(angle, 0.0);
}

#[test]
fn normalize_test() {
    let mut q = Quaternion::new(1.0, 1.0, 1.0, 1.0);
    let copy = q.normalized(false);
    assert_eq!(q, Quaternion::new(1.0, 1.0, 1.0, 1.0));

    q.normalize(false);
    assert_eq!(q, Quaternion::new(0.5, 0.5, 0.5, 0.5));
    assert_eq!(q, copy);
}

#[test]
fn normalize_with_sign_makes_w_non_negative() {
    let mut rand = Randf32::seed(17);
    for _ in 0..200 {
        let q = Quaternion::new(
            rand.next_in(-3.0..3.0),
            rand.next_in(-3.0..3.0),
            rand.next_in(-3.0..3.0),
            rand.next_in(-3.0..3.0),
        );
        if q.len() == 0.0 {
            continue;
        }
        let n = q.normalized(true);

        assert!(n.w >= 0.0);
        approx::assert_relative_eq!(n.len(), 1.0, epsilon = 1e-5);
    }

    let mut q = Quaternion::new(-2.0, 0.0, 2.0, 0.0);
    q.normalize(true);
    let h = 0.5f32.sqrt();
    approx::assert_relative_eq!(q.w, h, epsilon = 1e-6);
    approx::assert_relative_eq!(q.y, -h, epsilon = 1e-6);

    assert!(Quaternion::new(-2.0, 0.0, 0.0, 0.0).normalized(false).w < 0.0);
}

#[test]
fn double_cover_rotates_the_same() {
    let q = Quaternion::from_axis_angle(Vector::new(1.0, 2.0, 3.0), 2.5);
    let v = Vector::new(-1.0, 4.0, 0.5);

    assert_vec_near(q.rotate_vector(v), (-q).rotate_vector(v), 1e-5);
    assert_vec_near((-q).normalized(true).rotate_vector(v), q.rotate_vector(v), 1e-5);
}

#[test]
fn extreme_axis_lengths_still_give_unit_rotations() {
    let v = Vector::new(1.0, 0.0, 0.0);
    for axis in [
        Vector::new(0.0, 0.0, 1e20),
        Vector::new(0.0, 0.0, f32::MAX),
        Vector::new(0.0, 0.0, 1e-23),
        Vector::new(0.0, 0.0, 1e-40),
    ] {
        assert!(!axis.is_zero_vector());

        let q = Quaternion::from_axis_angle(axis, PI / 2.0);
        approx::assert_relative_eq!(q.len(), 1.0, epsilon = 1e-6);
        assert_vec_near(q.rotate_vector(v), Vector::new(0.0, 1.0, 0.0), 1e-6);
    }
}

#[test]
fn normalize_extreme_quaternions() {
    let h = 0.5f32.sqrt();

    let q = Quaternion::new(3e19, 3e19, 0.0, 0.0).normalized(true);
    approx::assert_relative_eq!(q.w, h, epsilon = 1e-6);
    approx::assert_relative_eq!(q.x, h, epsilon = 1e-6);

    let q = Quaternion::new(-3e38, 0.0, 0.0, 3e38).normalized(true);
    approx::assert_relative_eq!(q.w, h, epsilon = 1e-6);
    approx::assert_relative_eq!(q.z, -h, epsilon = 1e-6);

    let q = Quaternion::new(0.0, 1e-40, 0.0, 0.0).normalized(false);
    assert_eq!(q, Quaternion::new(0.0, 1.0, 0.0, 0.0));

    let inv = Quaternion::new(1e20, 0.0, 0.0, 0.0).inverse();
    approx::assert_relative_eq!(inv.w, 1e-20, epsilon = 0.0, max_relative = 1e-6);
    let prod = Quaternion::new(0.0, 2e19, 0.0, 2e19) * Quaternion::new(0.0, 2e19, 0.0, 2e19).inverse();
    approx::assert_relative_eq!(prod.w, 1.0, epsilon = 1e-6);
}

#[test]
fn zero_quaternion_normalizes_to_zero() {
    let mut q = Quaternion::zero();
    q.normalize(true);
    assert_eq!(q, Quaternion::zero());
    assert!(!q.w.is_nan());
    assert!(q.valid);
    assert_eq!(Quaternion::zero().inverse(), Quaternion::zero());
}

#[test]
fn nan_magnitude_clears_valid() {
    let mut q = Quaternion::new(1.0, f32::NAN, 0.0, 0.0);
    assert!(q.magnitude().is_nan());
    assert!(!q.valid);

    let q = Quaternion::from_axis_angle(Vector::new(f32::NAN, 0.0, 0.0), 1.0);
    assert!(!q.valid);
}

#[test]
fn conjugate_mutates_and_conjugated_copies() {
    let mut q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
    let c = q.conjugated();
    assert_eq!(q, Quaternion::new(1.0, 2.0, 3.0, 4.0));
    assert_eq!(c, Quaternion::new(1.0, -2.0, -3.0, -4.0));

    let original = q.copy();
    q.conjugate().conjugate();
    assert_eq!(q, original);

    let unit = Quaternion::from_axis_angle(Vector::new(1.0, 1.0, 0.0), 0.7);
    let prod = unit * unit.conjugated();
    approx::assert_relative_eq!(prod.w, 1.0, epsilon = 1e-6);
    assert_vec_near(prod.to_vector(), Vector::zero(), 1e-6);
}

#[test]
fn inverse_of_non_unit_quaternion() {
    let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
    let prod = q * q.inverse();

    approx::assert_relative_eq!(prod.w, 1.0, epsilon = 1e-6);
    assert_vec_near(prod.to_vector(), Vector::zero(), 1e-6);
}

#[test]
fn pure_quaternion_round_trip() {
    let v = Vector::new(1.5, -2.0, 3.0);
    let q = Quaternion::from(v);

    assert_eq!(q, Quaternion::new(0.0, 1.5, -2.0, 3.0));
    assert_eq!(q.to_vector(), v);
}

#[test]
fn algebraic_ops() {
    let a = Quaternion::new(1.0, 2.0, 3.0, 4.0);
    let b = Quaternion::new(0.5, -1.0, 0.0, 2.0);

    assert_eq!(a + b, Quaternion::new(1.5, 1.0, 3.0, 6.0));
    assert_eq!(a - b, Quaternion::new(0.5, 3.0, 3.0, 2.0));
    assert_eq!(-a, Quaternion::new(-1.0, -2.0, -3.0, -4.0));
    assert_eq!(a * 2.0, Quaternion::new(2.0, 4.0, 6.0, 8.0));
    assert_eq!(a / 2.0, Quaternion::new(0.5, 1.0, 1.5, 2.0));
    assert_eq!(a.dot(b), 6.5);

    let mut c = a;
    c += b;
    assert_eq!(c, a + b);
    c -= b;
    assert_eq!(c, a);
    c *= 0.5;
    assert_eq!(c, a / 2.0);
}

#[test]
fn display_test() {
    let q = Quaternion::new(1.0, 0.0, -0.25, 2.0 / 3.0);

    assert_eq!(q.to_string(), "w: 1.00, x: 0.00, y: -0.25, z: 0.67");
    assert_eq!(format!("{:.3}", q), "w: 1.000, x: 0.000, y: -0.250, z: 0.667");
    assert_eq!(Quaternion::IDENTITY.to_string_digits(1), "w: 1.0, x: 0.0, y: 0.0, z: 0.0");
}
