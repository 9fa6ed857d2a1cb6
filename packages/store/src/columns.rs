//! Column name mapping between a source table and the incident fields.
//!
//! Header names are matched literally (after trimming surrounding
//! whitespace). The defaults are the headers of the police.uk street-level
//! crime exports the dashboard was built around; any subset can be
//! overridden from a TOML file.

use std::path::Path;

use serde::Deserialize;

use crate::LoadError;

/// Header names for each incident field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMapping {
    /// Crime category column (required).
    pub crime_type: String,
    /// Area label column (required).
    pub area_name: String,
    /// Occurrence date column (required).
    pub date: String,
    /// Outcome column (optional in the source).
    pub outcome: String,
    /// Latitude column (optional in the source).
    pub latitude: String,
    /// Longitude column (optional in the source).
    pub longitude: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            crime_type: "Crime type".to_string(),
            area_name: "LSOA name".to_string(),
            date: "Date".to_string(),
            outcome: "Last outcome category".to_string(),
            latitude: "Latitude".to_string(),
            longitude: "Longitude".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Parses a mapping from TOML. Fields not present keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Config`] if the TOML is malformed or names an
    /// unknown field.
    pub fn from_toml_str(s: &str) -> Result<Self, LoadError> {
        toml::from_str(s).map_err(|e| LoadError::Config {
            message: format!("Invalid column mapping: {e}"),
        })
    }

    /// Reads a mapping from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path).map_err(|e| LoadError::Config {
            message: format!("Failed to read column mapping {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Resolves header names to column positions.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingDateColumn`] if the date column is
    /// absent, or [`LoadError::MissingColumn`] for any other required
    /// column.
    pub fn resolve(&self, headers: &[String]) -> Result<ColumnIndices, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(ColumnIndices {
            crime_type: require(&self.crime_type)?,
            area_name: require(&self.area_name)?,
            date: find(&self.date).ok_or_else(|| LoadError::MissingDateColumn {
                column: self.date.clone(),
            })?,
            outcome: find(&self.outcome),
            latitude: find(&self.latitude),
            longitude: find(&self.longitude),
        })
    }
}

/// Positions of the mapped columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    /// Crime category column.
    pub crime_type: usize,
    /// Area label column.
    pub area_name: usize,
    /// Date column.
    pub date: usize,
    /// Outcome column, if present.
    pub outcome: Option<usize>,
    /// Latitude column, if present.
    pub latitude: Option<usize>,
    /// Longitude column, if present.
    pub longitude: Option<usize>,
}
