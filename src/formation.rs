// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! F-formation test for a pair of people.
//!
//! Two people form an F-formation when they both face a shared empty region,
//! the O-space. For a candidate personal-space radius `r`, each person is
//! projected `r` meters along their facing direction; the O-space center is the
//! midpoint of the two projections. The pair is accepted at that radius when
//!
//! 1. the projections are no farther apart than either person is from the
//!    O-space center (both look inward), and
//! 2. nobody else stands within `r` of the O-space center.
//!
//! The radius set is searched in order and the first accepted radius wins.

use tracing::trace;

use crate::config::validate_radii;
use crate::error::{Result, SocialError, check_index};
use crate::geometry::{Point, distance, midpoint, project_forward};
use crate::scene::validate_people;

/// Distance reported for the O-space intruder when nobody else is present.
/// Larger than any plausible personal-space radius.
pub const NO_INTRUDER_DISTANCE: f64 = 100.0;

/// Geometry of a candidate O-space at one radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OSpace {
    /// Radius the people were projected by.
    pub radius: f64,
    /// Center of the O-space.
    pub center: Point,
    /// Distance between the two projected points, halved in distancing mode.
    pub spread: f64,
    /// Distance from the nearer person to the O-space center.
    pub reach: f64,
    /// Distance from the O-space center to the nearest third person.
    pub nearest_intruder: f64,
}

impl OSpace {
    /// Both people face the O-space.
    #[must_use]
    pub fn looks_inward(&self) -> bool {
        self.spread <= self.reach
    }

    /// Nobody else stands within the radius.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.nearest_intruder > self.radius
    }

    /// Both conditions hold.
    #[must_use]
    pub fn is_formation(&self) -> bool {
        self.looks_inward() && self.is_free()
    }
}

/// Compute the O-space of people `idx` and `idx_t` at one radius.
///
/// Inputs are assumed valid; see [`check_f_formation`] for the checked entry point.
#[must_use]
pub fn o_space(
    idx: usize,
    idx_t: usize,
    centers: &[Point],
    angles: &[f64],
    radius: f64,
    social_distance: bool,
) -> OSpace {
    let x_0 = centers[idx];
    let x_1 = centers[idx_t];
    let mu_0 = project_forward(&x_0, angles[idx], radius);
    let mu_1 = project_forward(&x_1, angles[idx_t], radius);
    let center = midpoint(&mu_0, &mu_1);

    let spread = if social_distance {
        distance(&mu_0, &mu_1) / 2.0
    } else {
        distance(&mu_0, &mu_1)
    };
    let reach = distance(&x_0, &center).min(distance(&x_1, &center));

    let nearest_intruder = centers
        .iter()
        .enumerate()
        .filter(|&(l, _)| l != idx && l != idx_t)
        .map(|(_, c)| distance(c, &center))
        .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |m| m.min(d))))
        .unwrap_or(NO_INTRUDER_DISTANCE);

    OSpace {
        radius,
        center,
        spread,
        reach,
        nearest_intruder,
    }
}

/// Find the first radius at which `idx` and `idx_t` form an F-formation.
///
/// Inputs are assumed valid.
#[must_use]
pub fn first_formation(
    idx: usize,
    idx_t: usize,
    centers: &[Point],
    angles: &[f64],
    radii: &[f64],
    social_distance: bool,
) -> Option<OSpace> {
    radii.iter().find_map(|&radius| {
        let space = o_space(idx, idx_t, centers, angles, radius, social_distance);
        trace!(
            idx,
            idx_t,
            radius,
            spread = space.spread,
            reach = space.reach,
            nearest_intruder = space.nearest_intruder,
            "o-space candidate"
        );
        space.is_formation().then_some(space)
    })
}

/// Check whether two people form an F-formation at some radius in `radii`.
///
/// This is an existential test: the radii are tried in order and the result is
/// `true` as soon as one of them yields an inward-looking, intrusion-free
/// configuration. The caller is expected to have already filtered the pair as
/// being close together.
///
/// # Arguments
///
/// * `idx` - Index of the focal person.
/// * `idx_t` - Index of the other person.
/// * `centers` - Ground-plane centers [x, z] of everybody in the scene.
/// * `angles` - Body orientations, same indexing as `centers`.
/// * `radii` - Candidate personal-space radii.
/// * `social_distance` - Use the stricter distancing criterion.
///
/// # Errors
///
/// Returns an error if an index is out of range, `idx == idx_t`, `angles` does
/// not match `centers`, a value is not finite, or `radii` is empty or holds a
/// non-positive radius.
pub fn check_f_formation(
    idx: usize,
    idx_t: usize,
    centers: &[Point],
    angles: &[f64],
    radii: &[f64],
    social_distance: bool,
) -> Result<bool> {
    validate_people(centers, angles, &[], &[], false)?;
    check_index(idx, centers.len())?;
    check_index(idx_t, centers.len())?;
    if idx == idx_t {
        return Err(SocialError::InvalidInput(format!(
            "a person cannot form a pair with itself (index {idx})"
        )));
    }
    validate_radii(radii)?;

    Ok(first_formation(idx, idx_t, centers, angles, radii, social_distance).is_some())
}
