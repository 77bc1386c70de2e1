// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Social Distancing
//!
//! Detects people who stand too close together while facing each other, from
//! the output of a monocular 3D localization network: each person's
//! ground-plane position, body orientation, and the depth estimate with the
//! scale of its Laplace-distributed error.
//!
//! ## Features
//!
//! - **F-formations** - Two people are flagged when both face a shared, empty
//!   O-space at one of a set of personal-space radii
//! - **Depth uncertainty** - Optional Monte-Carlo propagation of depth error
//!   along each person's camera ray
//! - **Reproducible** - Seeded sampling, one independent random stream per person
//! - **Pure** - No I/O, no global state; inputs are only borrowed
//!
//! ## Quick Start
//!
//! ```rust
//! use std::f64::consts::PI;
//! use social_distancing::{Scene, SocialConfig, SocialEvaluator};
//!
//! # fn main() -> social_distancing::Result<()> {
//! // Two people one meter apart, facing each other, plus a passer-by
//! let scene = Scene::new(
//!     vec![[0.0, 5.0], [1.0, 5.0], [4.0, 9.0]],
//!     vec![0.0, PI, 0.0],
//! )?
//! .with_uncertainty(vec![5.0, 5.1, 9.8], vec![0.05, 0.05, 0.3])?;
//!
//! let evaluator = SocialEvaluator::new(SocialConfig::new())?;
//! let flags = evaluator.evaluate_all(&scene)?;
//! assert_eq!(flags, vec![true, true, false]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Coordinate Conventions
//!
//! Positions are `[x, z]` in meters with the camera at the origin. Body
//! orientations follow the KITTI convention: a person with angle `theta` faces
//! `(cos theta, -sin theta)`. See [`geometry`] for details.
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`evaluator`] | [`social_interactions`] and the [`SocialEvaluator`] front end |
//! | [`formation`] | [`check_f_formation`], the pairwise O-space test |
//! | [`sampling`] | Laplace depth sampling and ray perturbation |
//! | [`scene`] | Per-frame input ([`Scene`], [`Person`]) |
//! | [`config`] | [`SocialConfig`] builder |
//! | [`geometry`] | Planar distance, projection and bearing helpers |
//! | [`error`] | Error types ([`SocialError`], [`Result`]) |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | (De)serialization of configs, scenes and verdicts (default) |
//! | `parallel` | Evaluate the people of a frame on the rayon thread pool |
//!
//! ## Logging
//!
//! Decisions are reported through [`tracing`] at `debug` and `trace` level.
//! Install a subscriber in the application to see them.

// Modules
pub mod config;
pub mod error;
pub mod evaluator;
pub mod formation;
pub mod geometry;
pub mod sampling;
pub mod scene;

// Re-export main types for convenience
pub use config::{DEFAULT_SEED, SocialConfig};
pub use error::{Result, SocialError};
pub use evaluator::{Candidate, PairVerdict, SocialEvaluator, candidates, social_interactions};
pub use formation::{OSpace, check_f_formation};
pub use geometry::Point;
pub use scene::{Person, Scene};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
