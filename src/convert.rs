//! Conversions to and from `cgmath`'s `f32` vector and quaternion types.
//!
//! Values coming from `cgmath` always start out with `valid` set.

use crate::vector::Vector;
use crate::quaternion::Quaternion;

impl From<Vector> for cgmath::Vector3<f32> {
    fn from(vec: Vector) -> Self {
        cgmath::Vector3::new(vec.x, vec.y, vec.z)
    }
}

impl From<cgmath::Vector3<f32>> for Vector {
    fn from(vec: cgmath::Vector3<f32>) -> Self {
        Vector::new(vec.x, vec.y, vec.z)
    }
}

impl From<Quaternion> for cgmath::Quaternion<f32> {
    fn from(quat: Quaternion) -> Self {
        cgmath::Quaternion::new(quat.w, quat.x, quat.y, quat.z)
    }
}

impl From<cgmath::Quaternion<f32>> for Quaternion {
    fn from(quat: cgmath::Quaternion<f32>) -> Self {
        Quaternion::new(quat.s, quat.v.x, quat.v.y, quat.v.z)
    }
}


#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Rad, Rotation, Rotation3};

    use crate::random::Randf32;
    use super::*;

    fn random_quaternion(rand: &mut Randf32) -> Quaternion {
        Quaternion::new(
            rand.next_in(-2.0..2.0),
            rand.next_in(-2.0..2.0),
            rand.next_in(-2.0..2.0),
            rand.next_in(-2.0..2.0),
        )
    }

    #[test]
    fn conversions_keep_components() {
        let v = Vector::new(1.0, -2.0, 3.5);
        let cv: cgmath::Vector3<f32> = v.into();
        assert_eq!(cv, cgmath::Vector3::new(1.0, -2.0, 3.5));
        assert_eq!(Vector::from(cv), v);

        let q = Quaternion::new(0.5, 1.0, -1.5, 2.0);
        let cq: cgmath::Quaternion<f32> = q.into();
        assert_eq!(cq.s, 0.5);
        assert_eq!(cq.v, cgmath::Vector3::new(1.0, -1.5, 2.0));
        assert_eq!(Quaternion::from(cq), q);
    }

    #[test]
    fn hamilton_product_agrees_with_cgmath() {
        let mut rand = Randf32::seed(31);
        for _ in 0..200 {
            let a = random_quaternion(&mut rand);
            let b = random_quaternion(&mut rand);

            let ours = a * b;
            let theirs = Quaternion::from(cgmath::Quaternion::from(a) * cgmath::Quaternion::from(b));

            approx::assert_abs_diff_eq!(ours.w, theirs.w, epsilon = 1e-4);
            approx::assert_abs_diff_eq!(ours.x, theirs.x, epsilon = 1e-4);
            approx::assert_abs_diff_eq!(ours.y, theirs.y, epsilon = 1e-4);
            approx::assert_abs_diff_eq!(ours.z, theirs.z, epsilon = 1e-4);
        }
    }

    #[test]
    fn axis_angle_rotation_agrees_with_cgmath() {
        let mut rand = Randf32::seed(37);
        for _ in 0..200 {
            let axis = Vector::random_in_range(&mut rand, -3.0..3.0);
            if axis.is_zero_vector() {
                continue;
            }
            let angle = rand.next_in(-6.0..6.0);
            let v = Vector::random_in_range(&mut rand, -10.0..10.0);

            let ours = Quaternion::from_axis_angle(axis, angle);
            let theirs = cgmath::Quaternion::from_axis_angle(
                cgmath::Vector3::from(axis).normalize(),
                Rad(angle),
            );
            approx::assert_abs_diff_eq!(ours.w, theirs.s, epsilon = 1e-5);

            let rotated = ours.rotate_vector(v);
            let expected = Vector::from(theirs.rotate_vector(v.into()));
            approx::assert_abs_diff_eq!(rotated.x, expected.x, epsilon = 1e-4);
            approx::assert_abs_diff_eq!(rotated.y, expected.y, epsilon = 1e-4);
            approx::assert_abs_diff_eq!(rotated.z, expected.z, epsilon = 1e-4);
        }
    }
}
