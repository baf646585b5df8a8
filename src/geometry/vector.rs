// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vector helpers layered on nalgebra's `Point3`/`Vector3`

use crate::error::{MeshError, MeshResult};
use crate::utils::math::round_to;
use nalgebra::{Point3, Vector3};

/// Decimal places used to strip floating-point noise before normalizing
pub const NORMAL_ROUNDING_DECIMALS: i32 = 14;

/// Direction returned when a zero-length vector is normalized
pub fn unit_x() -> Vector3<f64> {
    Vector3::new(1.0, 0.0, 0.0)
}

/// Mesh-specific operations on `Vector3<f64>`
pub trait VectorExt: Sized {
    /// Round every component to `decimals` places
    fn rounded(&self, decimals: i32) -> Self;

    /// Normalize in place; a zero vector becomes the unit X axis
    fn normalize_or_x(&mut self);

    /// Normalized copy; a zero vector yields the unit X axis
    fn normalized_or_x(&self) -> Self;

    /// Divide by a scalar, refusing to divide by zero
    fn checked_div(&self, divisor: f64) -> MeshResult<Self>;
}

impl VectorExt for Vector3<f64> {
    fn rounded(&self, decimals: i32) -> Self {
        self.map(|c| round_to(c, decimals))
    }

    fn normalize_or_x(&mut self) {
        *self = self.normalized_or_x();
    }

    fn normalized_or_x(&self) -> Self {
        let length = self.norm();
        if length == 0.0 || !length.is_finite() {
            unit_x()
        } else {
            self / length
        }
    }

    fn checked_div(&self, divisor: f64) -> MeshResult<Self> {
        if divisor == 0.0 {
            return Err(MeshError::DivisionByZero);
        }
        Ok(self / divisor)
    }
}

/// Face normal of the triangle `p0, p1, p2`, following its winding
pub fn face_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    (p1 - p0)
        .cross(&(p2 - p0))
        .rounded(NORMAL_ROUNDING_DECIMALS)
        .normalized_or_x()
}

/// Midpoint of two points, symmetric in its arguments
pub fn midpoint(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    Point3::from((a.coords + b.coords) * 0.5)
}

/// Build a point from a coordinate slice of unknown length
pub fn point_from_slice(coords: &[f64]) -> MeshResult<Point3<f64>> {
    match coords {
        [x, y, z] => Ok(Point3::new(*x, *y, *z)),
        _ => Err(MeshError::Dimension {
            operation: "point",
            expected: 3,
            found: coords.len(),
        }),
    }
}

/// Dot product of two coordinate slices of equal length
pub fn dot_slices(a: &[f64], b: &[f64]) -> MeshResult<f64> {
    if a.len() != b.len() {
        return Err(MeshError::Dimension {
            operation: "dot",
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Cross product of two coordinate slices; only defined in three dimensions
pub fn cross_slices(a: &[f64], b: &[f64]) -> MeshResult<Vector3<f64>> {
    for operand in [a, b] {
        if operand.len() != 3 {
            return Err(MeshError::Dimension {
                operation: "cross",
                expected: 3,
                found: operand.len(),
            });
        }
    }
    let u = Vector3::new(a[0], a[1], a[2]);
    let v = Vector3::new(b[0], b[1], b[2]);
    Ok(u.cross(&v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_vector_normalizes_to_x() {
        let mut v = Vector3::zeros();
        v.normalize_or_x();
        assert_eq!(v, unit_x());
        assert_eq!(Vector3::zeros().normalized_or_x(), unit_x());
    }

    #[test]
    fn test_normalized_has_unit_length() {
        let v = Vector3::new(3.0, 4.0, 12.0).normalized_or_x();
        assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.x, 3.0 / 13.0, epsilon = 1e-12);
    }

    #[test]
    fn test_checked_div() {
        let v = Vector3::new(2.0, 4.0, 6.0);
        assert_eq!(v.checked_div(2.0), Ok(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(v.checked_div(0.0), Err(MeshError::DivisionByZero));
    }

    #[test]
    fn test_rounded_strips_noise() {
        let v = Vector3::new(0.1 + 0.2, 1e-17, -2.0);
        let r = v.rounded(NORMAL_ROUNDING_DECIMALS);
        assert_eq!(r.x, 0.3);
        assert_eq!(r.y, 0.0);
        assert_eq!(r.z, -2.0);
    }

    #[test]
    fn test_face_normal_follows_winding() {
        let p0 = Point3::new(0.0, 0.0, 0.0);
        let p1 = Point3::new(1.0, 0.0, 0.0);
        let p2 = Point3::new(0.0, 1.0, 0.0);
        assert_eq!(face_normal(&p0, &p1, &p2), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(face_normal(&p0, &p2, &p1), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_midpoint_is_symmetric() {
        let a = Point3::new(0.1, 0.7, -3.3);
        let b = Point3::new(1.9, -0.2, 5.1);
        assert_eq!(midpoint(&a, &b), midpoint(&b, &a));
    }

    #[test]
    fn test_slice_dimension_errors() {
        assert!(point_from_slice(&[1.0, 2.0]).is_err());
        assert_eq!(point_from_slice(&[1.0, 2.0, 3.0]), Ok(Point3::new(1.0, 2.0, 3.0)));

        assert_eq!(dot_slices(&[1.0, 2.0], &[3.0, 4.0]), Ok(11.0));
        assert!(matches!(
            dot_slices(&[1.0, 2.0], &[3.0]),
            Err(MeshError::Dimension { operation: "dot", .. })
        ));

        assert_eq!(
            cross_slices(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]),
            Ok(Vector3::new(0.0, 0.0, 1.0))
        );
        assert!(matches!(
            cross_slices(&[1.0, 0.0], &[0.0, 1.0]),
            Err(MeshError::Dimension { operation: "cross", found: 2, .. })
        ));
    }
}
