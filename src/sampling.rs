// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Monte-Carlo propagation of depth uncertainty.
//!
//! Each person's depth is modelled as a Laplace distribution centred on the
//! estimate. Draws are turned back into ground-plane positions by moving the
//! person along its camera ray by the difference between estimate and draw.

use ndarray::{Array2, ArrayView1};
use rand::Rng;
use rand::distributions::Open01;

use crate::geometry::{Point, shift_along_ray};

/// Draw one value from `Laplace(location, scale)` by inverting its CDF.
///
/// A zero `scale` returns `location` exactly.
pub fn sample_laplace<R: Rng + ?Sized>(rng: &mut R, location: f64, scale: f64) -> f64 {
    // Open interval keeps the logarithm finite
    let u: f64 = rng.sample::<f64, _>(Open01) - 0.5;
    (-scale * u.signum()).mul_add((2.0f64.mul_add(-u.abs(), 1.0)).ln(), location)
}

/// Draw `n_samples` depths for every person.
///
/// # Arguments
///
/// * `dds` - Estimated depth per person (Laplace location).
/// * `stds` - Noise scale per person (Laplace scale), same length as `dds`.
/// * `n_samples` - Number of draws per person.
/// * `rng` - Random source.
///
/// # Returns
///
/// * Sample matrix of shape `(n_samples, N)`: row `s` holds draw `s` for
///   every person.
pub fn laplace_sampling<R: Rng + ?Sized>(
    dds: &[f64],
    stds: &[f64],
    n_samples: usize,
    rng: &mut R,
) -> Array2<f64> {
    debug_assert_eq!(dds.len(), stds.len());
    Array2::from_shape_fn((n_samples, dds.len()), |(_, i)| {
        sample_laplace(rng, dds[i], stds[i])
    })
}

/// Build the center set seen under one depth draw.
///
/// Only the people listed in `pair` are moved: each is shifted along its camera
/// ray by `dds[el] - sample[el]`. Everybody else keeps the estimated position.
/// The caller's centers are left untouched.
#[must_use]
pub fn perturb_centers(
    centers: &[Point],
    dds: &[f64],
    sample: ArrayView1<'_, f64>,
    pair: (usize, usize),
) -> Vec<Point> {
    let mut perturbed = centers.to_vec();
    for el in [pair.0, pair.1] {
        let delta_d = dds[el] - sample[el];
        perturbed[el] = shift_along_ray(&perturbed[el], delta_d);
    }
    perturbed
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::{Axis, array};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::geometry::distance;

    #[test]
    fn test_sampling_shape() {
        let mut rng = StdRng::seed_from_u64(0);
        let samples = laplace_sampling(&[4.0, 5.0, 6.0], &[0.1, 0.2, 0.3], 7, &mut rng);
        assert_eq!(samples.shape(), &[7, 3]);
    }

    #[test]
    fn test_zero_scale_returns_location() {
        let mut rng = StdRng::seed_from_u64(3);
        let samples = laplace_sampling(&[4.0, 7.5], &[0.0, 0.0], 50, &mut rng);
        assert!(samples.column(0).iter().all(|&x| x == 4.0));
        assert!(samples.column(1).iter().all(|&x| x == 7.5));
    }

    #[test]
    fn test_laplace_statistics() {
        let mut rng = StdRng::seed_from_u64(42);
        let (location, scale) = (10.0, 0.5);
        let samples = laplace_sampling(&[location], &[scale], 20_000, &mut rng);
        let column = samples.index_axis(Axis(1), 0);

        let mut sorted = column.to_vec();
        sorted.sort_by(f64::total_cmp);
        let median = sorted[sorted.len() / 2];
        assert_abs_diff_eq!(median, location, epsilon = 0.03);

        // E|X - mu| = b for a Laplace distribution
        let mad = column.iter().map(|x| (x - location).abs()).sum::<f64>() / 20_000.0;
        assert_abs_diff_eq!(mad, scale, epsilon = 0.03);

        assert!(column.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_sampling_is_seeded() {
        let a = laplace_sampling(&[5.0, 6.0], &[0.4, 0.4], 10, &mut StdRng::seed_from_u64(9));
        let b = laplace_sampling(&[5.0, 6.0], &[0.4, 0.4], 10, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_perturb_centers_moves_pair_only() {
        let centers = vec![[0.0, 5.0], [3.0, 4.0], [1.0, 1.0]];
        let dds = [5.0, 5.0, 1.4];
        let sample = array![5.5, 4.0, 9.0];

        let perturbed = perturb_centers(&centers, &dds, sample.view(), (0, 1));

        // delta = -0.5 along the z axis
        assert_abs_diff_eq!(perturbed[0][0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(perturbed[0][1], 4.5, epsilon = 1e-12);
        // delta = +1.0 along the ray through (3, 4)
        assert_abs_diff_eq!(distance(&perturbed[1], &[0.0, 0.0]), 6.0, epsilon = 1e-12);
        // Third party and the caller's data are untouched
        assert_eq!(perturbed[2], centers[2]);
        assert_eq!(centers[0], [0.0, 5.0]);
    }
}
