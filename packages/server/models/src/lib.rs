#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime dashboard server.
//!
//! View payloads reuse the analytics models directly; only the envelope
//! types and raw query parameters live here.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Number of incidents loaded.
    pub records: u64,
}

/// Error body returned for rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Wraps any displayable error.
    #[must_use]
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Scalar query parameters shared by the view endpoints.
///
/// The `crimeTypes` and `areas` lists are read from the raw query string
/// by the server, since a label may itself contain an encoded comma.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQueryParams {
    /// Inclusive start date (`YYYY-MM-DD`).
    pub from: Option<String>,
    /// Inclusive end date (`YYYY-MM-DD`).
    pub to: Option<String>,
    /// Entries per ranked panel (1-100, default 10).
    pub top_n: Option<usize>,
    /// View profile (`dashboard`, `heatmap`, `full`). Only read by
    /// `/api/view`.
    pub profile: Option<String>,
    /// Map mode (`density`, `points`).
    pub map_mode: Option<String>,
}
