// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of a three-dimensional vector used for atom and bead positions.

use std::ops::{AddAssign, Deref, DerefMut, Div, Mul};

use nalgebra::base::Vector3;

/// Position of a point in space.
/// Implemented using `nalgebra`'s Vector3.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Vector3D(pub(crate) Vector3<f32>);

impl From<[f32; 3]> for Vector3D {
    #[inline]
    fn from(arr: [f32; 3]) -> Self {
        Vector3D(Vector3::new(arr[0], arr[1], arr[2]))
    }
}

impl From<Vector3D> for [f32; 3] {
    #[inline]
    fn from(vec: Vector3D) -> Self {
        [vec.0.x, vec.0.y, vec.0.z]
    }
}

/// Allows accessing fields of `Vector3D` as `.x`, `.y`, and `.z`.
pub struct Vector3Raw {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Deref for Vector3D {
    type Target = Vector3Raw;

    #[inline]
    fn deref(&self) -> &Self::Target {
        unsafe { &*(self.0.as_ptr() as *const Vector3Raw) }
    }
}

impl DerefMut for Vector3D {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *(self.0.as_mut_ptr() as *mut Vector3Raw) }
    }
}

impl Vector3D {
    /// Create a new `Vector3D` structure.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vector3D(Vector3::new(x, y, z))
    }
}

impl Default for Vector3D {
    /// Create a zero vector.
    fn default() -> Self {
        Vector3D(Vector3::zeros())
    }
}

impl AddAssign for Vector3D {
    #[inline]
    fn add_assign(&mut self, rhs: Vector3D) {
        self.0 += rhs.0;
    }
}

impl Mul<f32> for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn mul(self, rhs: f32) -> Self::Output {
        Vector3D(self.0 * rhs)
    }
}

impl Div<f32> for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn div(self, rhs: f32) -> Self::Output {
        Vector3D(self.0 / rhs)
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn fields() {
        let mut vec = Vector3D::new(1.5, -2.0, 3.25);
        assert_eq!(vec.x, 1.5);
        assert_eq!(vec.y, -2.0);
        assert_eq!(vec.z, 3.25);

        vec.y = 7.0;
        assert_eq!(vec.y, 7.0);
    }

    #[test]
    fn array_conversions() {
        let vec: Vector3D = [1.0, 2.0, 3.0].into();
        let arr: [f32; 3] = vec.into();
        assert_eq!(arr, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn weighted_accumulation() {
        let mut sum = Vector3D::default();
        sum += Vector3D::new(1.0, 2.0, 3.0) * 2.0;
        sum += Vector3D::new(3.0, 0.0, -1.0) * 2.0;
        let center = sum / 4.0;

        assert_approx_eq!(f32, center.x, 2.0);
        assert_approx_eq!(f32, center.y, 1.0);
        assert_approx_eq!(f32, center.z, 1.0);
    }
}
