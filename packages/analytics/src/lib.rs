#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter engine and aggregator for the crime dashboard.
//!
//! [`filter::apply`] narrows a [`RecordStore`](crime_dash_store::RecordStore)
//! to the incidents matching a
//! [`Selection`](crime_dash_analytics_models::Selection);
//! [`aggregate`] derives metrics, ranked counts and the monthly trend from
//! the result; [`view::build_view`] assembles whichever panels a
//! [`ViewProfile`](crime_dash_analytics_models::ViewProfile) asks for.
//!
//! Every function here is pure: nothing is cached between calls and the
//! store is never mutated.

pub mod aggregate;
pub mod filter;
pub mod params;
pub mod view;

use thiserror::Error;

/// Errors that can occur while turning caller input into a selection.
///
/// Filtering and aggregation themselves cannot fail; an empty result is a
/// valid outcome, not an error.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A date string could not be parsed.
    #[error("Invalid date '{value}': {message}. Expected format: YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        value: String,
        /// Parser message.
        message: String,
    },

    /// Some other parameter was out of range or unrecognized.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Description of what went wrong.
        message: String,
    },
}
