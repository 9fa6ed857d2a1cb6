#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime incident record types.
//!
//! An [`Incident`] is one normalized row of the source dataset. Its
//! [`MonthBucket`] is derived from the occurrence date when the record is
//! constructed and cannot be set independently, so trend aggregation can
//! always trust it.

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Calendar-month grouping key (`YYYY-MM`) used for trend aggregation.
///
/// Ordering is chronological: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    year: i32,
    month: u32,
}

impl MonthBucket {
    /// Truncates a date to its year and month.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Creates a bucket from an explicit year and month.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMonthBucketError`] if `month` is not in `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, InvalidMonthBucketError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(InvalidMonthBucketError {
                value: format!("{year:04}-{month:02}"),
            })
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Calendar month (1-12).
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First day of the month this bucket covers.
    #[must_use]
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl std::fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthBucket {
    type Err = InvalidMonthBucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMonthBucketError {
            value: s.to_string(),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for MonthBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when a string or year/month pair is not a valid
/// [`MonthBucket`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMonthBucketError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidMonthBucketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid month bucket '{}': expected YYYY-MM", self.value)
    }
}

impl std::error::Error for InvalidMonthBucketError {}

/// A latitude/longitude pair (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

/// One recorded crime incident.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Crime category label as it appears in the dataset.
    pub crime_type: String,
    /// Geographic sub-area label.
    pub area_name: String,
    /// Date the incident occurred.
    pub occurred_on: NaiveDate,
    month_bucket: MonthBucket,
    /// Last recorded outcome, if any.
    pub outcome_category: Option<String>,
    /// Latitude, if recorded.
    pub latitude: Option<f64>,
    /// Longitude, if recorded.
    pub longitude: Option<f64>,
}

impl Incident {
    /// Creates an incident with no outcome and no coordinates.
    #[must_use]
    pub fn new(
        crime_type: impl Into<String>,
        area_name: impl Into<String>,
        occurred_on: NaiveDate,
    ) -> Self {
        Self {
            crime_type: crime_type.into(),
            area_name: area_name.into(),
            occurred_on,
            month_bucket: MonthBucket::from_date(occurred_on),
            outcome_category: None,
            latitude: None,
            longitude: None,
        }
    }

    /// Sets the outcome category.
    #[must_use]
    pub fn with_outcome(mut self, outcome: Option<String>) -> Self {
        self.outcome_category = outcome;
        self
    }

    /// Sets the coordinates. Either half may be missing.
    #[must_use]
    pub fn with_position(mut self, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// The month this incident falls in.
    #[must_use]
    pub const fn month_bucket(&self) -> MonthBucket {
        self.month_bucket
    }

    /// Both coordinates, or `None` if either is missing.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates {
            latitude: self.latitude?,
            longitude: self.longitude?,
        })
    }
}
