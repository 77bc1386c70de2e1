// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Per-frame scene state.
//!
//! A [`Scene`] holds the localization output for one frame as parallel
//! sequences indexed by person: ground-plane centers, body orientations and,
//! when available, the estimated depth with the scale of its Laplace noise.

use crate::error::{Result, SocialError, check_index, check_len};
use crate::geometry::Point;

/// One detected person, as produced by the upstream localization step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Person {
    /// Ground-plane position [x, z] in meters.
    pub center: Point,
    /// Body orientation in radians (KITTI convention).
    pub angle: f64,
    /// Estimated distance from the camera in meters.
    pub depth: Option<f64>,
    /// Scale of the Laplace noise on `depth`.
    pub depth_std: Option<f64>,
}

impl Person {
    /// Create a person without depth uncertainty.
    #[must_use]
    pub const fn new(center: Point, angle: f64) -> Self {
        Self {
            center,
            angle,
            depth: None,
            depth_std: None,
        }
    }

    /// Attach a depth estimate and the scale of its noise.
    #[must_use]
    pub const fn with_depth(mut self, depth: f64, depth_std: f64) -> Self {
        self.depth = Some(depth);
        self.depth_std = Some(depth_std);
        self
    }
}

/// Localization output for one frame.
///
/// `dds` and `stds` are either empty or hold one entry per person. They are
/// only required when depth uncertainty is propagated by sampling.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scene {
    /// Ground-plane centers [x, z].
    pub centers: Vec<Point>,
    /// Body orientations in radians.
    pub angles: Vec<f64>,
    /// Estimated depths.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dds: Vec<f64>,
    /// Scales of the depth noise.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stds: Vec<f64>,
}

impl Scene {
    /// Create a scene from centers and orientations.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::LengthMismatch`] if `angles` does not have one
    /// entry per center.
    pub fn new(centers: Vec<Point>, angles: Vec<f64>) -> Result<Self> {
        check_len("angles", centers.len(), angles.len())?;
        Ok(Self {
            centers,
            angles,
            dds: Vec::new(),
            stds: Vec::new(),
        })
    }

    /// Attach depth estimates and their noise scales.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::LengthMismatch`] if either sequence does not have
    /// one entry per person.
    pub fn with_uncertainty(mut self, dds: Vec<f64>, stds: Vec<f64>) -> Result<Self> {
        check_len("dds", self.len(), dds.len())?;
        check_len("stds", self.len(), stds.len())?;
        self.dds = dds;
        self.stds = stds;
        Ok(self)
    }

    /// Build a scene from a list of people.
    ///
    /// Depth data is kept only if every person carries it.
    #[must_use]
    pub fn from_people<I>(people: I) -> Self
    where
        I: IntoIterator<Item = Person>,
    {
        let people: Vec<Person> = people.into_iter().collect();
        let uncertainty: Option<(Vec<f64>, Vec<f64>)> = people
            .iter()
            .map(|p| p.depth.zip(p.depth_std))
            .collect::<Option<Vec<_>>>()
            .map(|pairs| pairs.into_iter().unzip());
        let (dds, stds) = uncertainty.unwrap_or_default();

        Self {
            centers: people.iter().map(|p| p.center).collect(),
            angles: people.iter().map(|p| p.angle).collect(),
            dds,
            stds,
        }
    }

    /// Number of people in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    /// Check if the scene contains nobody.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Whether depth estimates and noise scales are present.
    #[must_use]
    pub fn has_uncertainty(&self) -> bool {
        !self.is_empty() && !self.dds.is_empty() && !self.stds.is_empty()
    }

    /// Get the person at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::IndexOutOfRange`] for an invalid index and
    /// [`SocialError::LengthMismatch`] if a per-person sequence is short.
    pub fn person(&self, index: usize) -> Result<Person> {
        check_index(index, self.len())?;
        check_len("angles", self.len(), self.angles.len())?;
        if !self.dds.is_empty() {
            check_len("dds", self.len(), self.dds.len())?;
        }
        if !self.stds.is_empty() {
            check_len("stds", self.len(), self.stds.len())?;
        }
        Ok(Person {
            center: self.centers[index],
            angle: self.angles[index],
            depth: self.dds.get(index).copied(),
            depth_std: self.stds.get(index).copied(),
        })
    }

    /// Check the scene invariants.
    ///
    /// Centers and angles must have one finite entry per person, and depth
    /// data, if present, one entry per person. When
    /// `require_uncertainty` is set, `dds` and `stds` must be present too, with
    /// finite depths and finite non-negative scales.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::LengthMismatch`], [`SocialError::MissingUncertainty`]
    /// or [`SocialError::InvalidInput`] describing the first violated invariant.
    pub fn validate(&self, require_uncertainty: bool) -> Result<()> {
        validate_people(
            &self.centers,
            &self.angles,
            &self.dds,
            &self.stds,
            require_uncertainty,
        )
    }
}

/// Check that every center is finite.
pub(crate) fn validate_centers(centers: &[Point]) -> Result<()> {
    match centers.iter().position(|c| !(c[0].is_finite() && c[1].is_finite())) {
        Some(i) => Err(SocialError::InvalidInput(format!(
            "center of person {i} is not finite: {:?}",
            centers[i]
        ))),
        None => Ok(()),
    }
}

/// Validate parallel per-person sequences.
pub(crate) fn validate_people(
    centers: &[Point],
    angles: &[f64],
    dds: &[f64],
    stds: &[f64],
    require_uncertainty: bool,
) -> Result<()> {
    let n = centers.len();
    check_len("angles", n, angles.len())?;
    validate_centers(centers)?;
    if let Some(i) = angles.iter().position(|a| !a.is_finite()) {
        return Err(SocialError::InvalidInput(format!(
            "angle of person {i} is not finite: {}",
            angles[i]
        )));
    }

    // Depth data may be omitted, but not truncated
    if !dds.is_empty() {
        check_len("dds", n, dds.len())?;
    }
    if !stds.is_empty() {
        check_len("stds", n, stds.len())?;
    }

    if !require_uncertainty {
        return Ok(());
    }
    if dds.is_empty() || stds.is_empty() {
        return Err(SocialError::MissingUncertainty(
            "depth estimates and noise scales are required for sampling".to_string(),
        ));
    }

    if let Some(i) = dds.iter().position(|d| !d.is_finite()) {
        return Err(SocialError::InvalidInput(format!(
            "depth of person {i} is not finite: {}",
            dds[i]
        )));
    }
    if let Some(i) = stds.iter().position(|s| !(s.is_finite() && *s >= 0.0)) {
        return Err(SocialError::InvalidInput(format!(
            "depth scale of person {i} must be finite and non-negative, got {}",
            stds[i]
        )));
    }
    Ok(())
}
