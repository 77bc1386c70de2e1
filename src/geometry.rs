// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Planar geometry on the ground plane.
//!
//! Positions are `[x, z]` pairs in meters: `x` is lateral, `z` is forward depth
//! from the camera. Two angle conventions meet here:
//!
//! - **Body orientation** follows the KITTI convention, where the `z` axis is
//!   inverted relative to the rotation direction. A person facing `theta` looks
//!   along `(cos theta, -sin theta)`.
//! - **Camera bearing** is the direction of the ray from the camera (origin) to
//!   a position, `atan2(z, x)`, so the ray itself is `(cos, +sin)`.

/// A ground-plane position `[x, z]`.
pub type Point = [f64; 2];

/// Euclidean distance between two ground-plane positions.
///
/// # Arguments
///
/// * `a` - First position [x, z]
/// * `b` - Second position [x, z]
#[must_use]
pub fn distance(a: &Point, b: &Point) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

/// Midpoint of two positions.
#[must_use]
pub fn midpoint(a: &Point, b: &Point) -> Point {
    [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]
}

/// Point reached by walking `length` meters from `center` in the facing
/// direction `theta` (KITTI convention).
#[must_use]
pub fn project_forward(center: &Point, theta: f64, length: f64) -> Point {
    [
        length.mul_add(theta.cos(), center[0]),
        (-length).mul_add(theta.sin(), center[1]),
    ]
}

/// Bearing of the camera ray through `center`.
///
/// A position at the origin has bearing `0.0`, since `atan2(0, 0) == 0` for
/// `f64`; such a position is shifted along `+x` by [`shift_along_ray`].
#[must_use]
pub fn bearing(center: &Point) -> f64 {
    center[1].atan2(center[0])
}

/// Move `center` by `delta` meters along its own camera ray.
///
/// A positive `delta` moves away from the camera. This is how an error in the
/// estimated depth turns into an error of the ground-plane position.
#[must_use]
pub fn shift_along_ray(center: &Point, delta: f64) -> Point {
    let theta = bearing(center);
    [
        delta.mul_add(theta.cos(), center[0]),
        delta.mul_add(theta.sin(), center[1]),
    ]
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_distance() {
        assert_abs_diff_eq!(distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_abs_diff_eq!(distance(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(midpoint(&[0.0, 2.0], &[2.0, 4.0]), [1.0, 3.0]);
    }

    #[test]
    fn test_project_forward_kitti_convention() {
        let p = project_forward(&[1.0, 5.0], 0.0, 0.5);
        assert_abs_diff_eq!(p[0], 1.5);
        assert_abs_diff_eq!(p[1], 5.0);

        // Facing pi/2 moves towards the camera (negative z)
        let p = project_forward(&[1.0, 5.0], FRAC_PI_2, 0.5);
        assert_abs_diff_eq!(p[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p[1], 4.5, epsilon = 1e-12);

        let p = project_forward(&[1.0, 5.0], PI, 0.5);
        assert_abs_diff_eq!(p[0], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_shift_along_ray() {
        // Straight ahead of the camera the ray is the z axis
        let p = shift_along_ray(&[0.0, 4.0], 1.0);
        assert_abs_diff_eq!(p[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p[1], 5.0, epsilon = 1e-12);

        // Shifting keeps the bearing and changes the range by delta
        let c = [3.0, 4.0];
        let p = shift_along_ray(&c, -1.0);
        assert_abs_diff_eq!(bearing(&p), bearing(&c), epsilon = 1e-12);
        assert_abs_diff_eq!(distance(&p, &[0.0, 0.0]), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bearing_at_origin() {
        assert_abs_diff_eq!(bearing(&[0.0, 0.0]), 0.0);
        let p = shift_along_ray(&[0.0, 0.0], 0.5);
        assert_abs_diff_eq!(p[0], 0.5);
        assert_abs_diff_eq!(p[1], 0.0);
    }
}
