//! List parameters read straight from the raw query string.
//!
//! A literal `,` separates values while `%2C` is part of a value, so
//! labels that contain commas stay selectable. Repeating a key adds to
//! its set. A key that is present with no usable value selects nothing.

use std::collections::BTreeSet;
use std::str::Utf8Error;

use crime_dash_analytics::AnalyticsError;
use percent_encoding::percent_decode_str;

fn decode(raw: &str) -> Result<String, Utf8Error> {
    let raw = raw.replace('+', " ");
    Ok(percent_decode_str(&raw).decode_utf8()?.into_owned())
}

/// Collects every value of `key` in `query`.
///
/// Returns `None` when `key` does not appear.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidParameter`] if a value does not
/// decode to UTF-8.
pub fn list_param(query: &str, key: &str) -> Result<Option<BTreeSet<String>>, AnalyticsError> {
    let invalid = |e: Utf8Error| AnalyticsError::InvalidParameter {
        name: key.to_string(),
        message: e.to_string(),
    };

    let mut values: Option<BTreeSet<String>> = None;

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (name, raw) = pair.split_once('=').unwrap_or((pair, ""));
        if decode(name).ok().as_deref() != Some(key) {
            continue;
        }

        let set = values.get_or_insert_with(BTreeSet::new);
        for piece in raw.split(',') {
            let value = decode(piece).map_err(invalid)?;
            let value = value.trim();
            if !value.is_empty() {
                set.insert(value.to_string());
            }
        }
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn absent_key_is_none() {
        assert_eq!(list_param("from=2024-01-01", "crimeTypes").unwrap(), None);
        assert_eq!(list_param("", "crimeTypes").unwrap(), None);
    }

    #[test]
    fn splits_on_literal_commas_and_trims() {
        assert_eq!(
            list_param("crimeTypes=%20Theft%20,Burglary,,", "crimeTypes").unwrap(),
            Some(set(&["Theft", "Burglary"]))
        );
    }

    #[test]
    fn encoded_comma_stays_in_the_value() {
        assert_eq!(
            list_param("crimeTypes=Theft%2C%20from%20vehicle,Burglary", "crimeTypes").unwrap(),
            Some(set(&["Theft, from vehicle", "Burglary"]))
        );
    }

    #[test]
    fn repeated_keys_union() {
        assert_eq!(
            list_param("areas=AreaA&from=2024-01-01&areas=Area+B", "areas").unwrap(),
            Some(set(&["AreaA", "Area B"]))
        );
    }

    #[test]
    fn present_but_blank_is_empty() {
        assert_eq!(list_param("areas=", "areas").unwrap(), Some(BTreeSet::new()));
        assert_eq!(list_param("areas", "areas").unwrap(), Some(BTreeSet::new()));
        assert_eq!(list_param("areas=,%20", "areas").unwrap(), Some(BTreeSet::new()));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert!(matches!(
            list_param("areas=%FF", "areas"),
            Err(AnalyticsError::InvalidParameter { .. })
        ));
    }
}
