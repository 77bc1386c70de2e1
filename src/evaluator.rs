// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Social interaction evaluation.
//!
//! For a focal person, every other person within the distance gate is a
//! candidate. Each candidate pair is run through the F-formation test, either
//! once on the estimated positions or once per Monte-Carlo draw of the two
//! people's depths. The focal person is flagged as soon as one candidate pair
//! is flagged.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::config::{SocialConfig, validate_threshold_dist};
use crate::error::{Result, check_index};
use crate::formation::first_formation;
use crate::geometry::{Point, distance};
use crate::sampling::{laplace_sampling, perturb_centers};
use crate::scene::{Scene, validate_centers, validate_people};

/// A nearby person considered for a pair test.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Index of the nearby person.
    pub index: usize,
    /// Planar distance to the focal person in meters.
    pub distance: f64,
}

/// Verdict for one focal/candidate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairVerdict {
    /// Focal person.
    pub idx: usize,
    /// Candidate person.
    pub idx_t: usize,
    /// Planar distance between the two.
    pub distance: f64,
    /// Fraction of depth draws flagging the pair. `0.0` or `1.0` when
    /// uncertainty is not sampled.
    pub probability: f64,
    /// Whether the pair is flagged.
    pub violation: bool,
}

/// Rank every other person by distance to `idx` and keep those within
/// `threshold_dist` (inclusive). Ties keep index order. Inputs are assumed valid.
fn rank_candidates(idx: usize, centers: &[Point], threshold_dist: f64) -> Vec<Candidate> {
    let origin = centers[idx];
    let mut ranked: Vec<Candidate> = centers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != idx)
        .map(|(index, c)| Candidate {
            index,
            distance: distance(&origin, c),
        })
        .collect();
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.retain(|c| c.distance <= threshold_dist);
    ranked
}

/// People close enough to `idx` to be tested, nearest first.
///
/// # Errors
///
/// Returns [`crate::SocialError::ConfigError`] if `threshold_dist` is NaN or
/// not positive, and an input error if `idx` is out of range or a center is
/// not finite.
pub fn candidates(idx: usize, centers: &[Point], threshold_dist: f64) -> Result<Vec<Candidate>> {
    validate_threshold_dist(threshold_dist)?;
    check_index(idx, centers.len())?;
    validate_centers(centers)?;
    Ok(rank_candidates(idx, centers, threshold_dist))
}

/// Fraction of depth draws under which `idx` and `idx_t` form an F-formation.
#[allow(clippy::cast_precision_loss)]
fn sample_fraction(
    idx: usize,
    idx_t: usize,
    centers: &[Point],
    angles: &[f64],
    dds: &[f64],
    samples: &Array2<f64>,
    config: &SocialConfig,
) -> f64 {
    let hits = samples
        .rows()
        .into_iter()
        .filter(|sample| {
            let perturbed = perturb_centers(centers, dds, sample.view(), (idx, idx_t));
            first_formation(
                idx,
                idx_t,
                &perturbed,
                angles,
                &config.radii,
                config.social_distance,
            )
            .is_some()
        })
        .count();
    hits as f64 / samples.nrows() as f64
}

/// Evaluation inputs after validation.
struct Checked<'a> {
    centers: &'a [Point],
    angles: &'a [f64],
    dds: &'a [f64],
    stds: &'a [f64],
    config: &'a SocialConfig,
}

impl<'a> Checked<'a> {
    fn new(
        idx: usize,
        centers: &'a [Point],
        angles: &'a [f64],
        dds: &'a [f64],
        stds: &'a [f64],
        config: &'a SocialConfig,
    ) -> Result<Self> {
        config.validate()?;
        validate_people(centers, angles, dds, stds, config.is_probabilistic())?;
        check_index(idx, centers.len())?;
        Ok(Self {
            centers,
            angles,
            dds,
            stds,
            config,
        })
    }

    /// Depth draws for everybody, or `None` on the deterministic path.
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Array2<f64>> {
        self.config
            .is_probabilistic()
            .then(|| laplace_sampling(self.dds, self.stds, self.config.n_samples, rng))
    }

    /// Flag probability for one pair.
    fn probability(&self, idx: usize, idx_t: usize, samples: Option<&Array2<f64>>) -> f64 {
        match samples {
            Some(samples) => sample_fraction(
                idx,
                idx_t,
                self.centers,
                self.angles,
                self.dds,
                samples,
                self.config,
            ),
            None => {
                let formation = first_formation(
                    idx,
                    idx_t,
                    self.centers,
                    self.angles,
                    &self.config.radii,
                    self.config.social_distance,
                );
                if formation.is_some() { 1.0 } else { 0.0 }
            }
        }
    }

    /// Whether a pair with the given probability is flagged.
    fn is_violation(&self, probability: f64, sampled: bool) -> bool {
        if sampled {
            probability >= self.config.threshold_prob
        } else {
            probability > 0.0
        }
    }
}

/// Decide whether person `idx` is in a violating pair with anybody nearby.
///
/// Candidates are visited nearest first and the first flagged pair ends the
/// search. With `config.n_samples < 2` each pair is tested once on the
/// estimated positions. Otherwise one `(n_samples, N)` matrix of Laplace depth
/// draws is taken from `rng`, each pair is tested once per draw with the two
/// people moved along their camera rays, and the pair is flagged when the
/// fraction of positive draws reaches `config.threshold_prob`.
///
/// # Arguments
///
/// * `idx` - Focal person.
/// * `centers` - Ground-plane centers [x, z].
/// * `angles` - Body orientations.
/// * `dds` - Estimated depths; may be empty on the deterministic path.
/// * `stds` - Depth noise scales; may be empty on the deterministic path.
/// * `config` - Evaluation parameters.
/// * `rng` - Random source for depth draws.
///
/// # Errors
///
/// Returns an error if `idx` is out of range, a sequence length does not match
/// `centers`, depth data is missing while sampling, a value is invalid, or the
/// configuration does not validate.
pub fn social_interactions<R: Rng + ?Sized>(
    idx: usize,
    centers: &[Point],
    angles: &[f64],
    dds: &[f64],
    stds: &[f64],
    config: &SocialConfig,
    rng: &mut R,
) -> Result<bool> {
    let checked = Checked::new(idx, centers, angles, dds, stds, config)?;
    let samples = checked.draw(rng);
    let nearby = rank_candidates(idx, centers, config.threshold_dist);
    debug!(idx, candidates = nearby.len(), "evaluating social interactions");

    for candidate in &nearby {
        let probability = checked.probability(idx, candidate.index, samples.as_ref());
        trace!(idx, idx_t = candidate.index, probability, "pair tested");
        if checked.is_violation(probability, samples.is_some()) {
            debug!(idx, idx_t = candidate.index, probability, "violation");
            return Ok(true);
        }
    }
    Ok(false)
}

/// Evaluates scenes against a fixed [`SocialConfig`].
///
/// Each focal index gets its own random stream derived from the configured
/// seed, so a person's verdict does not depend on which other people were
/// evaluated before it, nor on evaluation order across threads.
///
/// # Example
///
/// ```rust
/// use social_distancing::{Scene, SocialConfig, SocialEvaluator};
///
/// # fn main() -> social_distancing::Result<()> {
/// let scene = Scene::new(vec![[0.0, 5.0], [1.0, 5.0]], vec![0.0, std::f64::consts::PI])?;
/// let evaluator = SocialEvaluator::new(SocialConfig::new().with_samples(1))?;
/// assert_eq!(evaluator.evaluate_all(&scene)?, vec![true, true]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SocialEvaluator {
    config: SocialConfig,
}

impl SocialEvaluator {
    /// Create an evaluator.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SocialError::ConfigError`] if the configuration is invalid.
    pub fn new(config: SocialConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The evaluation parameters.
    #[must_use]
    pub const fn config(&self) -> &SocialConfig {
        &self.config
    }

    /// Random stream for focal person `idx`.
    fn rng_for(&self, idx: usize) -> StdRng {
        self.config.seed.map_or_else(StdRng::from_entropy, |seed| {
            StdRng::seed_from_u64(seed.wrapping_add(idx as u64))
        })
    }

    /// Decide whether person `idx` is in a violating pair.
    ///
    /// # Errors
    ///
    /// See [`social_interactions`].
    pub fn evaluate(&self, idx: usize, scene: &Scene) -> Result<bool> {
        social_interactions(
            idx,
            &scene.centers,
            &scene.angles,
            &scene.dds,
            &scene.stds,
            &self.config,
            &mut self.rng_for(idx),
        )
    }

    /// Verdicts for every candidate pair of person `idx`, nearest first.
    ///
    /// Unlike [`Self::evaluate`] this does not stop at the first flagged pair.
    /// The same depth draws are used, so `evaluate` is `true` exactly when one
    /// of these verdicts is a violation.
    ///
    /// # Errors
    ///
    /// See [`social_interactions`].
    pub fn evaluate_pairs(&self, idx: usize, scene: &Scene) -> Result<Vec<PairVerdict>> {
        let checked = Checked::new(
            idx,
            &scene.centers,
            &scene.angles,
            &scene.dds,
            &scene.stds,
            &self.config,
        )?;
        let samples = checked.draw(&mut self.rng_for(idx));

        let verdicts = rank_candidates(idx, &scene.centers, self.config.threshold_dist)
            .into_iter()
            .map(|candidate| {
                let probability = checked.probability(idx, candidate.index, samples.as_ref());
                PairVerdict {
                    idx,
                    idx_t: candidate.index,
                    distance: candidate.distance,
                    probability,
                    violation: checked.is_violation(probability, samples.is_some()),
                }
            })
            .collect();
        Ok(verdicts)
    }

    /// One verdict per person, in index order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Self::evaluate`].
    pub fn evaluate_all(&self, scene: &Scene) -> Result<Vec<bool>> {
        if scene.is_empty() {
            return Ok(Vec::new());
        }
        scene.validate(self.config.is_probabilistic())?;

        #[cfg(feature = "parallel")]
        let flags = {
            use rayon::prelude::*;
            (0..scene.len())
                .into_par_iter()
                .map(|idx| self.evaluate(idx, scene))
                .collect::<Result<Vec<bool>>>()?
        };
        #[cfg(not(feature = "parallel"))]
        let flags = (0..scene.len())
            .map(|idx| self.evaluate(idx, scene))
            .collect::<Result<Vec<bool>>>()?;

        debug!(
            people = scene.len(),
            violations = flags.iter().filter(|&&f| f).count(),
            "scene evaluated"
        );
        Ok(flags)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::error::SocialError;

    fn deterministic() -> SocialConfig {
        SocialConfig::new().with_samples(1)
    }

    // Two people facing each other one meter apart, plus a third far away
    fn group_scene() -> Scene {
        Scene::new(
            vec![[0.0, 5.0], [1.0, 5.0], [6.0, 5.0]],
            vec![0.0, PI, 0.0],
        )
        .unwrap()
        .with_uncertainty(vec![5.0, 5.1, 7.8], vec![0.0, 0.0, 0.0])
        .unwrap()
    }

    #[test]
    fn test_candidates_sorted_and_gated() {
        let centers = vec![[0.0, 0.0], [1.5, 0.0], [0.5, 0.0], [5.0, 0.0]];
        let nearby = candidates(0, &centers, 2.0).unwrap();
        let indices: Vec<usize> = nearby.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![2, 1]);
        assert!((nearby[0].distance - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_candidates_inclusive_boundary() {
        let centers = vec![[0.0, 0.0], [2.0, 0.0]];
        assert_eq!(candidates(0, &centers, 2.0).unwrap().len(), 1);
        assert!(candidates(0, &centers, 1.999).unwrap().is_empty());
    }

    #[test]
    fn test_candidates_reject_invalid_threshold() {
        let centers = vec![[0.0, 0.0], [1.0, 0.0]];
        for threshold in [f64::NAN, 0.0, -1.0] {
            assert!(matches!(
                candidates(0, &centers, threshold),
                Err(SocialError::ConfigError(_))
            ));
        }
    }

    #[test]
    fn test_candidates_exclude_self_even_when_coincident() {
        let centers = vec![[1.0, 1.0], [1.0, 1.0]];
        let nearby = candidates(1, &centers, 2.0).unwrap();
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].index, 0);
    }

    #[test]
    fn test_deterministic_violation() {
        let scene = group_scene();
        let evaluator = SocialEvaluator::new(deterministic()).unwrap();
        assert!(evaluator.evaluate(0, &scene).unwrap());
        assert!(evaluator.evaluate(1, &scene).unwrap());
        assert!(!evaluator.evaluate(2, &scene).unwrap());
    }

    #[test]
    fn test_zero_uncertainty_matches_deterministic() {
        let scene = group_scene();
        let sampled = SocialEvaluator::new(SocialConfig::new().with_samples(50)).unwrap();
        let exact = SocialEvaluator::new(deterministic()).unwrap();
        assert_eq!(
            sampled.evaluate_all(&scene).unwrap(),
            exact.evaluate_all(&scene).unwrap()
        );
    }

    #[test]
    fn test_pairs_agree_with_evaluate() {
        let scene = Scene::new(
            vec![[0.0, 5.0], [1.0, 5.0], [0.5, 5.8], [0.2, 4.2]],
            vec![0.0, PI, -PI / 2.0, PI / 2.0],
        )
        .unwrap()
        .with_uncertainty(vec![5.0, 5.1, 5.8, 4.2], vec![0.3, 0.3, 0.2, 0.4])
        .unwrap();
        let evaluator = SocialEvaluator::new(SocialConfig::new().with_seed(7)).unwrap();

        for idx in 0..scene.len() {
            let pairs = evaluator.evaluate_pairs(idx, &scene).unwrap();
            assert!(pairs.iter().all(|p| (0.0..=1.0).contains(&p.probability)));
            assert!(pairs.windows(2).all(|w| w[0].distance <= w[1].distance));
            assert_eq!(
                pairs.iter().any(|p| p.violation),
                evaluator.evaluate(idx, &scene).unwrap()
            );
        }
    }

    #[test]
    fn test_missing_uncertainty() {
        let scene = Scene::new(vec![[0.0, 5.0], [1.0, 5.0]], vec![0.0, PI]).unwrap();
        let evaluator = SocialEvaluator::new(SocialConfig::new()).unwrap();
        assert!(matches!(
            evaluator.evaluate(0, &scene),
            Err(SocialError::MissingUncertainty(_))
        ));
        // The deterministic path does not need depth data
        let evaluator = SocialEvaluator::new(deterministic()).unwrap();
        assert!(evaluator.evaluate(0, &scene).unwrap());
    }

    #[test]
    fn test_truncated_depth_rejected_when_deterministic() {
        let scene = group_scene();
        let mut rng = StdRng::seed_from_u64(0);
        let err = social_interactions(
            0,
            &scene.centers,
            &scene.angles,
            &scene.dds[..2],
            &scene.stds,
            &deterministic(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, SocialError::LengthMismatch { field: "dds", .. }));
    }

    #[test]
    fn test_index_out_of_range() {
        let evaluator = SocialEvaluator::new(deterministic()).unwrap();
        assert!(matches!(
            evaluator.evaluate(3, &group_scene()),
            Err(SocialError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(SocialEvaluator::new(SocialConfig::new().with_threshold_prob(2.0)).is_err());

        let scene = group_scene();
        let mut rng = StdRng::seed_from_u64(0);
        let config = SocialConfig::new().with_radii(vec![]);
        assert!(matches!(
            social_interactions(
                0,
                &scene.centers,
                &scene.angles,
                &scene.dds,
                &scene.stds,
                &config,
                &mut rng
            ),
            Err(SocialError::ConfigError(_))
        ));
    }

    #[test]
    fn test_single_person_scene() {
        let scene = Scene::new(vec![[0.0, 3.0]], vec![0.0]).unwrap();
        let evaluator = SocialEvaluator::new(deterministic()).unwrap();
        assert_eq!(evaluator.evaluate_all(&scene).unwrap(), vec![false]);
        assert!(evaluator.evaluate_pairs(0, &scene).unwrap().is_empty());
    }
}
