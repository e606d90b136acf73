use std::ops::Mul;

use crate::vector::Vector;
use crate::quaternion::Quaternion;

/// Column-major 3 x 3 matrix.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Mat3x3 {
    pub c0: Vector,
    pub c1: Vector,
    pub c2: Vector,
}
impl Mat3x3 {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        c0r0: f32, c0r1: f32, c0r2: f32,
        c1r0: f32, c1r1: f32, c1r2: f32,
        c2r0: f32, c2r1: f32, c2r2: f32,
    ) -> Self {
        Self::from_cols(
            Vector::new(c0r0, c0r1, c0r2),
            Vector::new(c1r0, c1r1, c1r2),
            Vector::new(c2r0, c2r1, c2r2),
        )
    }

    pub fn from_cols(c0: Vector, c1: Vector, c2: Vector) -> Self {
        Self { c0, c1, c2 }
    }

    pub fn identity() -> Self {
        Self::new(
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
        )
    }

    pub fn transpose(&self) -> Self {
        Self::new(
            self.c0.x, self.c1.x, self.c2.x,
            self.c0.y, self.c1.y, self.c2.y,
            self.c0.z, self.c1.z, self.c2.z,
        )
    }
}

impl From<[[f32; 3]; 3]> for Mat3x3 {
    fn from(mat: [[f32; 3]; 3]) -> Mat3x3 {
        Self::from_cols(mat[0].into(), mat[1].into(), mat[2].into())
    }
}

impl From<Mat3x3> for [[f32; 3]; 3] {
    fn from(mat: Mat3x3) -> [[f32; 3]; 3] {
        [mat.c0.into(), mat.c1.into(), mat.c2.into()]
    }
}

impl From<Quaternion> for Mat3x3 {
    /// Rotation matrix of a unit quaternion: its columns are the rotated basis vectors.
    fn from(quat: Quaternion) -> Mat3x3 {
        Mat3x3::from_cols(
            quat.rotate_vector(Vector::new(1.0, 0.0, 0.0)),
            quat.rotate_vector(Vector::new(0.0, 1.0, 0.0)),
            quat.rotate_vector(Vector::new(0.0, 0.0, 1.0)),
        )
    }
}

impl Mul<Vector> for Mat3x3 {
    type Output = Vector;

    fn mul(self, vec: Vector) -> Self::Output {
        self.c0 * vec.x + self.c1 * vec.y + self.c2 * vec.z
    }
}

impl Mul for Mat3x3 {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        Mat3x3::from_cols(self * other.c0, self * other.c1, self * other.c2)
    }
}


#[cfg(test)]
fn assert_mat_near(a: Mat3x3, b: Mat3x3) {
    let a: [[f32; 3]; 3] = a.into();
    let b: [[f32; 3]; 3] = b.into();
    for (ca, cb) in a.iter().zip(b.iter()) {
        for (ea, eb) in ca.iter().zip(cb.iter()) {
            approx::assert_abs_diff_eq!(*ea, *eb, epsilon = 1e-5);
        }
    }
}

#[test]
fn mat_multiply() {
    let mat1 = Mat3x3::new(
        1.0, 5.0, 9.0,
        2.0, 6.0, 1.0,
        3.0, 7.0, 2.0,
    );
    let mat2 = Mat3x3::new(
        10.0, 14.0, 18.0,
        11.0, 15.0, 19.0,
        12.0, 16.0, 10.0,
    );
    let res = mat1 * mat2;

    assert!(res == Mat3x3::new(
        92.0, 260.0, 140.0,
        98.0, 278.0, 152.0,
        74.0, 226.0, 144.0,
    ));
    assert!(mat1 * Mat3x3::identity() == mat1);
}

#[test]
fn identity_quaternion_gives_identity_matrix() {
    assert_eq!(Mat3x3::from(Quaternion::IDENTITY), Mat3x3::identity());
}

#[test]
fn quarter_turn_about_z_matrix() {
    let h = 0.5f32.sqrt();
    let mat = Mat3x3::from(Quaternion::new(h, 0.0, 0.0, h));

    // first column is the closed form (1-2(y²+z²), 2(xy+wz), 2(xz-wy))
    assert_mat_near(mat, Mat3x3::new(
        0.0,  1.0, 0.0,
        -1.0, 0.0, 0.0,
        0.0,  0.0, 1.0,
    ));
}

#[test]
fn matrix_rotation_matches_quaternion() {
    let mut rand = crate::random::Randf32::seed(21);
    for _ in 0..100 {
        let q = Quaternion::random_rotation(&mut rand);
        let v = Vector::random_in_range(&mut rand, -5.0..5.0);

        let by_mat = Mat3x3::from(q) * v;
        let by_quat = q.rotate_vector(v);
        approx::assert_abs_diff_eq!(by_mat.x, by_quat.x, epsilon = 1e-4);
        approx::assert_abs_diff_eq!(by_mat.y, by_quat.y, epsilon = 1e-4);
        approx::assert_abs_diff_eq!(by_mat.z, by_quat.z, epsilon = 1e-4);
    }
}

#[test]
fn matrix_composition_matches_hamilton_product() {
    let mut rand = crate::random::Randf32::seed(23);
    for _ in 0..50 {
        let q1 = Quaternion::random_rotation(&mut rand);
        let q2 = Quaternion::random_rotation(&mut rand);

        assert_mat_near(Mat3x3::from(q1) * Mat3x3::from(q2), Mat3x3::from(q1 * q2));

        let m = Mat3x3::from(q1);
        assert_mat_near(m * m.transpose(), Mat3x3::identity());
        assert_mat_near(m.transpose(), Mat3x3::from(q1.conjugated()));
    }
}

#[test]
fn array_round_trip() {
    let arr = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
    let mat = Mat3x3::from(arr);

    assert_eq!(mat.c1, Vector::new(4.0, 5.0, 6.0));
    assert_eq!(<[[f32; 3]; 3]>::from(mat), arr);
    assert_eq!(<[[f32; 3]; 3]>::from(mat.transpose())[0], [1.0, 4.0, 7.0]);
}
