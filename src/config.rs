// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Evaluation configuration.
//!
//! This module defines the [`SocialConfig`] struct, which controls how a violation
//! verdict is reached: the distance gate for nearby people, the candidate
//! personal-space radii, and the Monte-Carlo sampling of depth uncertainty.

use crate::error::{Result, SocialError};

/// Seed used for Monte-Carlo sampling unless the caller overrides it.
pub const DEFAULT_SEED: u64 = 1;

/// Configuration for social interaction evaluation.
///
/// It uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use social_distancing::SocialConfig;
///
/// let config = SocialConfig::new()
///     .with_samples(50)
///     .with_threshold_prob(0.3)
///     .with_threshold_dist(2.5)
///     .with_radii(vec![0.3, 0.5, 0.7]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SocialConfig {
    /// Use the stricter distancing criterion.
    /// The projected facing points must be twice as close to each other as in
    /// the conversational-group test.
    pub social_distance: bool,
    /// Number of Monte-Carlo draws of each person's depth.
    /// Values below `2` select the deterministic path.
    pub n_samples: usize,
    /// Fraction of samples (0.0 to 1.0) that must flag a pair for the
    /// probabilistic path to report a violation.
    pub threshold_prob: f64,
    /// Maximum planar distance (meters, inclusive) for another person to be
    /// considered at all.
    pub threshold_dist: f64,
    /// Candidate personal-space radii, tried in order.
    pub radii: Vec<f64>,
    /// Seed for the sampling RNG. `None` draws a fresh seed from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            social_distance: false,
            n_samples: 100,
            threshold_prob: 0.25,
            threshold_dist: 2.0,
            radii: vec![0.3, 0.5],
            seed: Some(DEFAULT_SEED),
        }
    }
}

impl SocialConfig {
    /// Create a new configuration with default values.
    ///
    /// # Returns
    ///
    /// * A new `SocialConfig` instance with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the stricter distancing criterion.
    #[must_use]
    pub const fn with_social_distance(mut self, social_distance: bool) -> Self {
        self.social_distance = social_distance;
        self
    }

    /// Set the number of Monte-Carlo samples.
    ///
    /// # Arguments
    ///
    /// * `n_samples` - Number of depth draws per person. `1` disables sampling.
    ///
    /// # Returns
    ///
    /// * The modified `SocialConfig`.
    #[must_use]
    pub const fn with_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// Set the fraction of samples required to report a violation.
    #[must_use]
    pub const fn with_threshold_prob(mut self, threshold: f64) -> Self {
        self.threshold_prob = threshold;
        self
    }

    /// Set the distance gate for nearby people.
    ///
    /// # Arguments
    ///
    /// * `threshold` - Maximum planar distance in meters (inclusive).
    ///
    /// # Returns
    ///
    /// * The modified `SocialConfig`.
    #[must_use]
    pub const fn with_threshold_dist(mut self, threshold: f64) -> Self {
        self.threshold_dist = threshold;
        self
    }

    /// Set the candidate personal-space radii.
    ///
    /// The formation test accepts the first radius in this order that yields
    /// a valid, non-intruded configuration.
    #[must_use]
    pub fn with_radii(mut self, radii: Vec<f64>) -> Self {
        self.radii = radii;
        self
    }

    /// Fix the sampling seed so repeated evaluations agree.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seed the sampling RNG from OS entropy on every evaluation.
    #[must_use]
    pub const fn with_entropy(mut self) -> Self {
        self.seed = None;
        self
    }

    /// Whether this configuration propagates depth uncertainty by sampling.
    #[must_use]
    pub const fn is_probabilistic(&self) -> bool {
        self.n_samples >= 2
    }

    /// Check that every parameter is within its documented domain.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::ConfigError`] if `n_samples` is zero, `threshold_prob`
    /// lies outside `[0, 1]`, `threshold_dist` is not positive, or `radii` is
    /// empty or contains a non-positive radius.
    pub fn validate(&self) -> Result<()> {
        if self.n_samples == 0 {
            return Err(SocialError::ConfigError(
                "n_samples must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.threshold_prob) {
            return Err(SocialError::ConfigError(format!(
                "threshold_prob must be within [0, 1], got {}",
                self.threshold_prob
            )));
        }
        validate_threshold_dist(self.threshold_dist)?;
        validate_radii(&self.radii)
    }
}

/// Check a candidate distance gate: strictly positive, not NaN.
pub(crate) fn validate_threshold_dist(threshold_dist: f64) -> Result<()> {
    if threshold_dist.is_nan() || threshold_dist <= 0.0 {
        return Err(SocialError::ConfigError(format!(
            "threshold_dist must be positive, got {threshold_dist}"
        )));
    }
    Ok(())
}

/// Check a radius set: non-empty, every radius finite and strictly positive.
pub(crate) fn validate_radii(radii: &[f64]) -> Result<()> {
    if radii.is_empty() {
        return Err(SocialError::ConfigError(
            "at least one radius is required".to_string(),
        ));
    }
    if let Some(r) = radii.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
        return Err(SocialError::ConfigError(format!(
            "radii must be finite and positive, got {r}"
        )));
    }
    Ok(())
}
