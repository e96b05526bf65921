//! Shared test utilities for the tsunami map workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Boundary GeoJSON and advisory record fixtures
//! - Temporary file helpers for config and region files
//! - Approximate float / coordinate assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, assert_approx_eq};
//! ```

pub mod fixtures;
pub mod paths;

pub use fixtures::*;
pub use paths::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of a [`Coordinate`] against `(lat, lon)`.
///
/// [`Coordinate`]: advisory_common::Coordinate
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_coord_approx_eq;
///
/// assert_coord_approx_eq!(label.coordinate, (37.75, 140.47), 1e-9);
/// ```
#[macro_export]
macro_rules! assert_coord_approx_eq {
    ($coord:expr, ($lat:expr, $lon:expr), $epsilon:expr) => {{
        let coord: advisory_common::Coordinate = $coord;
        $crate::assert_approx_eq!(coord.lat, $lat, $epsilon);
        $crate::assert_approx_eq!(coord.lon, $lon, $epsilon);
    }};
}
