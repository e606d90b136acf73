use std::ops::{Neg, Add, AddAssign, Sub, SubAssign, Mul, MulAssign, Div, DivAssign, Range};
use std::iter::Sum;
use std::fmt;

use crate::random::Randf32;

/// Downward gravitational acceleration in m/s².
pub const GRAVITY: Vector = Vector::new(0.0, 0.0, -9.81);

/// A 3-component vector.
///
/// `valid` is advisory. It is cleared when [`Vector::magnitude`] comes out
/// as NaN and no operation reads it back, so NaN values keep flowing through
/// arithmetic until the caller inspects either the flag or the result.
///
/// Equality is exact and componentwise; `valid` does not take part in it.
#[derive(Clone, Copy, Debug)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub valid: bool,
}
impl Vector {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, valid: true }
    }

    /// All three components set to `n`.
    pub const fn splat(n: f32) -> Self {
        Self::new(n, n, n)
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn copy(&self) -> Self {
        *self
    }

    /// Euclidean length. Squares are summed in f64, so components near the
    /// ends of the f32 range neither overflow nor underflow.
    pub fn len(&self) -> f32 {
        self.len_f64() as f32
    }

    fn len_f64(&self) -> f64 {
        let (x, y, z) = (self.x as f64, self.y as f64, self.z as f64);
        (x*x + y*y + z*z).sqrt()
    }

    pub fn len_sq(&self) -> f32 {
        self.x*self.x + self.y*self.y + self.z*self.z
    }

    /// Euclidean norm. A NaN result clears `valid` and is returned as is.
    pub fn magnitude(&mut self) -> f32 {
        let m = self.len();
        if m.is_nan() {
            log::debug!("vector magnitude is NaN ({}, {}, {})", self.x, self.y, self.z);
            self.valid = false;
        }
        m
    }

    pub fn is_zero_vector(&self) -> bool {
        self.len() == 0.0
    }

    /// Scales the vector to unit length in place.
    ///
    /// A zero vector stays the zero vector instead of turning into NaN.
    /// The division happens in f64, so lengths outside the f32 range still
    /// give a unit vector.
    pub fn normalize(&mut self) -> &mut Self {
        let mag = self.magnitude();

        if mag == 0.0 {
            log::trace!("normalize: zero vector left as zero");
            self.x = 0.0;
            self.y = 0.0;
            self.z = 0.0;
        }
        else {
            let mag = self.len_f64();
            self.x = (self.x as f64 / mag) as f32;
            self.y = (self.y as f64 / mag) as f32;
            self.z = (self.z as f64 / mag) as f32;
        }
        self
    }

    /// Unit-length copy; `self` is left untouched. See [`Vector::normalize`].
    pub fn normalized(&self) -> Self {
        let mut vec = *self;
        vec.normalize();
        vec
    }

    pub fn dot(&self, vec: Vector) -> f32 {
        self.x*vec.x + self.y*vec.y + self.z*vec.z
    }

    /// Right-handed cross product, `a.cross(b) == -b.cross(a)`.
    pub fn cross(&self, vec: Vector) -> Self {
        Self::new(
            self.y*vec.z - self.z*vec.y,
            self.z*vec.x - self.x*vec.z,
            self.x*vec.y - self.y*vec.x,
        )
    }

    /// Componentwise (Hadamard) product.
    pub fn comp_wise_mul(&self, vec: Vector) -> Self {
        Self::new(self.x*vec.x, self.y*vec.y, self.z*vec.z)
    }

    /// Angle between the two vectors in radians, in `[0, π]`.
    ///
    /// Returns `0.0` when either vector has zero length. The cosine is
    /// clamped so rounding on (anti)parallel inputs cannot leave acos's domain.
    pub fn angle_to(&self, vec: Vector) -> f32 {
        let lens = self.len_f64() * vec.len_f64();
        if lens == 0.0 {
            log::trace!("angle_to: zero-length operand, angle taken as 0");
            return 0.0;
        }
        let dot = self.x as f64 * vec.x as f64
            + self.y as f64 * vec.y as f64
            + self.z as f64 * vec.z as f64;
        (dot / lens).clamp(-1.0, 1.0).acos() as f32
    }

    /// Projection of `self` onto the line spanned by `vec`.
    ///
    /// Projecting onto a zero vector gives the zero vector.
    pub fn projection_on(&self, mut vec: Vector) -> Self {
        vec.normalize();
        vec * self.dot(vec)
    }

    /// Renders `x: .., y: .., z: ..` with `digits` decimals.
    pub fn to_string_digits(&self, digits: usize) -> String {
        format!("{:.*}", digits, self)
    }

    pub fn random_in_range(rand: &mut Randf32, range: Range<f32>) -> Self {
        Self::new(
            rand.next_in(range.clone()),
            rand.next_in(range.clone()),
            rand.next_in(range),
        )
    }

    pub fn random_in_unit_sphere(rand: &mut Randf32) -> Self {
        loop {
            let vec = Self::random_in_range(rand, -1.0..1.0);
            if vec.len_sq() <= 1.0 && !vec.is_zero_vector() {
                return vec;
            }
        }
    }

    pub fn random_unit_vec(rand: &mut Randf32) -> Self {
        Self::random_in_unit_sphere(rand).normalized()
    }
}

impl Default for Vector {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

/// Dot product.
impl Mul for Vector {
    type Output = f32;

    fn mul(self, other: Self) -> Self::Output {
        self.dot(other)
    }
}

impl Mul<f32> for Vector {
    type Output = Self;

    fn mul(self, other: f32) -> Self::Output {
        Self::new(self.x * other, self.y * other, self.z * other)
    }
}

impl MulAssign<f32> for Vector {
    fn mul_assign(&mut self, other: f32) {
        self.x *= other;
        self.y *= other;
        self.z *= other;
    }
}

impl Div<f32> for Vector {
    type Output = Self;

    fn div(self, other: f32) -> Self::Output {
        Self::new(self.x / other, self.y / other, self.z / other)
    }
}

impl DivAssign<f32> for Vector {
    fn div_assign(&mut self, other: f32) {
        self.x /= other;
        self.y /= other;
        self.z /= other;
    }
}

impl From<[f32; 3]> for Vector {
    fn from(arr: [f32; 3]) -> Vector {
        Vector::new(arr[0], arr[1], arr[2])
    }
}

impl From<Vector> for [f32; 3] {
    fn from(vec: Vector) -> [f32; 3] {
        [vec.x, vec.y, vec.z]
    }
}

impl<'a> Sum<&'a Vector> for Vector {
    fn sum<I>(iter: I) -> Self where I: Iterator<Item = &'a Self> {
        iter.fold(Vector::zero(), |acc, vec| acc + *vec)
    }
}

/// `x: <v>, y: <v>, z: <v>`, two decimals unless a precision is given.
impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f.precision().unwrap_or(2);
        write!(f, "x: {:.*}, y: {:.*}, z: {:.*}",
            digits, self.x,
            digits, self.y,
            digits, self.z,
        )
    }
}


#[test]
fn cross_test() {
    let v  = Vector::new(4.0, 3.0, 6.0);
    let v2 = Vector::new(2.0, 9.0, 3.0);

    let cross = v.cross(v2);
    assert!(cross == Vector::new(-45.0, 0.0, 30.0));
}

#[test]
fn dot_test() {
    let v  = Vector::new(4.0, 3.0, 6.0);
    let v2 = Vector::new(2.0, 9.0, 3.0);

    assert!(v.dot(v2) == 53.0);
    assert!(v * v2 == 53.0);
}

#[test]
fn cross_is_anti_commutative_and_dot_commutative() {
    let mut rand = Randf32::seed(7);
    for _ in 0..200 {
        let a = Vector::random_in_range(&mut rand, -10.0..10.0);
        let b = Vector::random_in_range(&mut rand, -10.0..10.0);

        assert_eq!(a.cross(b), -b.cross(a));
        assert_eq!(a.dot(b), b.dot(a));
        assert_eq!(a.cross(a), Vector::zero());
    }
}

#[test]
fn normalize_gives_unit_length() {
    let mut rand = Randf32::seed(11);
    for _ in 0..1000 {
        // scales from subnormal up to f32::MAX territory
        let scale = 10f32.powf(rand.next_in(-40.0..38.0));
        let mut v = Vector::random_in_range(&mut rand, -1.0..1.0) * scale;
        if v.is_zero_vector() {
            continue;
        }
        v.normalize();
        approx::assert_relative_eq!(v.len(), 1.0, epsilon = 1e-5);
        assert!(v.valid);
    }
}

#[test]
fn normalize_extreme_magnitudes() {
    let h = 0.5f32.sqrt();
    let cases = [
        (Vector::new(1e20, 0.0, 0.0), Vector::new(1.0, 0.0, 0.0)),
        (Vector::new(0.0, -3e38, 3e38), Vector::new(0.0, -h, h)),
        (Vector::new(f32::MAX, 0.0, 0.0), Vector::new(1.0, 0.0, 0.0)),
        (Vector::new(0.0, 1e-23, 0.0), Vector::new(0.0, 1.0, 0.0)),
        (Vector::new(0.0, 0.0, -1e-40), Vector::new(0.0, 0.0, -1.0)),
        (Vector::new(1e-30, 1e-30, 0.0), Vector::new(h, h, 0.0)),
    ];
    for (v, expected) in cases {
        assert!(!v.is_zero_vector());

        let n = v.normalized();
        approx::assert_relative_eq!(n.len(), 1.0, epsilon = 1e-6);
        approx::assert_abs_diff_eq!(n.x, expected.x, epsilon = 1e-6);
        approx::assert_abs_diff_eq!(n.y, expected.y, epsilon = 1e-6);
        approx::assert_abs_diff_eq!(n.z, expected.z, epsilon = 1e-6);
    }

    approx::assert_relative_eq!(Vector::new(1e20, 0.0, 0.0).len(), 1e20);
    approx::assert_relative_eq!(Vector::new(0.0, 3e-23, 4e-23).len(), 5e-23, epsilon = 0.0, max_relative = 1e-6);
}

#[test]
fn angle_to_extreme_magnitudes() {
    let huge = Vector::new(1e20, 0.0, 0.0);
    let tiny = Vector::new(1e-30, 1e-30, 0.0);

    approx::assert_relative_eq!(huge.angle_to(Vector::new(0.0, 1e30, 0.0)), std::f32::consts::FRAC_PI_2);
    approx::assert_relative_eq!(huge.angle_to(tiny), std::f32::consts::FRAC_PI_4, epsilon = 1e-6);
    approx::assert_relative_eq!(tiny.angle_to(-huge), 3.0 * std::f32::consts::FRAC_PI_4, epsilon = 1e-6);
}

#[test]
fn normalize_mutates_and_normalized_copies() {
    let mut v = Vector::new(3.0, 0.0, 4.0);
    let n = v.normalized();
    assert_eq!(v, Vector::new(3.0, 0.0, 4.0));

    let returned = *v.normalize();
    assert_eq!(returned, v);
    assert_eq!(v, n);
    approx::assert_relative_eq!(v.x, 0.6);
    approx::assert_relative_eq!(v.z, 0.8);
}

#[test]
fn zero_vector_normalizes_to_zero() {
    let mut v = Vector::zero();
    v.normalize();

    assert!(v == Vector::new(0.0, 0.0, 0.0));
    assert!(!v.x.is_nan());
    assert!(v.valid);
    assert!(v.is_zero_vector());
    assert!(!Vector::new(0.0, 1e-3, 0.0).is_zero_vector());
}

#[test]
fn nan_magnitude_clears_valid() {
    let mut v = Vector::new(f32::NAN, 1.0, 2.0);
    assert!(v.valid);

    let m = v.magnitude();
    assert!(m.is_nan());
    assert!(!v.valid);

    // normalize keeps computing through NaN
    let mut w = Vector::new(1.0, f32::NAN, 0.0);
    w.normalize();
    assert!(!w.valid);
    assert!(w.x.is_nan());
}

#[test]
fn angle_to_test() {
    let x = Vector::new(1.0, 0.0, 0.0);
    let y = Vector::new(0.0, 2.0, 0.0);

    approx::assert_relative_eq!(x.angle_to(y), std::f32::consts::FRAC_PI_2);
    approx::assert_relative_eq!(x.angle_to(-x * 3.0), std::f32::consts::PI);
    assert_eq!(x.angle_to(x * 5.0), 0.0);
    approx::assert_relative_eq!(
        x.angle_to(Vector::new(1.0, 1.0, 0.0)),
        std::f32::consts::FRAC_PI_4,
        epsilon = 1e-6
    );
}

#[test]
fn angle_to_zero_vector_is_zero() {
    let v = Vector::new(1.0, 2.0, 3.0);
    assert_eq!(v.angle_to(Vector::zero()), 0.0);
    assert_eq!(Vector::zero().angle_to(v), 0.0);
}

#[test]
fn projection_test() {
    let v = Vector::new(3.0, 4.0, 5.0);
    let onto = Vector::new(0.0, 10.0, 0.0);

    assert_eq!(v.projection_on(onto), Vector::new(0.0, 4.0, 0.0));
    assert_eq!(v.projection_on(Vector::zero()), Vector::zero());

    let diag = v.projection_on(Vector::new(1.0, 1.0, 0.0));
    approx::assert_relative_eq!(diag.x, 3.5, epsilon = 1e-5);
    approx::assert_relative_eq!(diag.y, 3.5, epsilon = 1e-5);
    approx::assert_relative_eq!(diag.z, 0.0);
}

#[test]
fn equality_is_exact() {
    let a = Vector::new(0.1, 0.2, 0.3);
    let b = Vector::new(0.1, 0.2, 0.3 + 1e-7);

    assert!(a == a.copy());
    assert!(a != b);

    let mut invalid = a;
    invalid.valid = false;
    assert!(a == invalid);
}

#[test]
fn scalar_and_componentwise_ops() {
    let mut v = Vector::new(1.0, -2.0, 4.0);

    assert_eq!(v * 2.0, Vector::new(2.0, -4.0, 8.0));
    assert_eq!(v / 2.0, Vector::new(0.5, -1.0, 2.0));
    assert_eq!(v.comp_wise_mul(Vector::new(2.0, 3.0, 0.5)), Vector::new(2.0, -6.0, 2.0));
    assert_eq!(Vector::splat(2.0), Vector::new(2.0, 2.0, 2.0));

    v *= 3.0;
    assert_eq!(v, Vector::new(3.0, -6.0, 12.0));
    v += Vector::new(1.0, 1.0, 1.0);
    assert_eq!(v, Vector::new(4.0, -5.0, 13.0));
    v -= Vector::splat(4.0);
    assert_eq!(v, Vector::new(0.0, -9.0, 9.0));
    v /= 9.0;
    assert_eq!(v, Vector::new(0.0, -1.0, 1.0));

    let total: Vector = [v, GRAVITY].iter().sum();
    approx::assert_relative_eq!(total.z, -8.81, epsilon = 1e-5);
}

#[test]
fn display_test() {
    let v = Vector::new(1.0, -2.5, 1.0 / 3.0);

    assert_eq!(v.to_string(), "x: 1.00, y: -2.50, z: 0.33");
    assert_eq!(format!("{:.1}", v), "x: 1.0, y: -2.5, z: 0.3");
    assert_eq!(Vector::new(1.0, -2.4, 0.3).to_string_digits(0), "x: 1, y: -2, z: 0");
    assert_eq!(GRAVITY.to_string(), "x: 0.00, y: 0.00, z: -9.81");
}
