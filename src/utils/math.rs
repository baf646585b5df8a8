// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

/// Round `value` to `decimals` decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    // Fold -0.0 so rounded values compare and hash like their positive twins
    (scaled.round() / factor) + 0.0
}

/// Check if two floats are approximately equal
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Convert radians to degrees
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / std::f64::consts::PI
}

/// Triangle area from its three side lengths (Heron's formula)
///
/// Sides are sorted so the product is evaluated in the numerically stable
/// order; slightly negative products from rounding clamp to zero.
pub fn heron_area(a: f64, b: f64, c: f64) -> f64 {
    let mut sides = [a, b, c];
    sides.sort_by(|x, y| y.total_cmp(x));
    let [a, b, c] = sides;
    let product = (a + (b + c)) * (c - (a - b)) * (c + (a - b)) * (a + (b - c));
    0.25 * product.max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0001, 0.001));
        assert!(!approx_eq(1.0, 1.1, 0.001));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-1.235, 1), -1.2);
        assert_eq!(round_to(0.1 + 0.2, 14), 0.3);
        assert!(round_to(-1e-20, 14).is_sign_positive());
    }

    #[test]
    fn test_heron_area() {
        assert!(approx_eq(heron_area(3.0, 4.0, 5.0), 6.0, 1e-12));
        assert!(approx_eq(heron_area(1.0, 1.0, 2.0_f64.sqrt()), 0.5, 1e-12));
        // Collinear sides
        assert_eq!(heron_area(1.0, 1.0, 2.0), 0.0);
    }

    #[test]
    fn test_angle_conversion() {
        assert!(approx_eq(rad_to_deg(std::f64::consts::PI), 180.0, 1e-12));
    }
}
