//! Bundled census resources and their raw CSV records
//!
//! Source: US Census Bureau ANSI/FIPS code lists (2010)
//! Reference: https://www.census.gov/library/reference/code-lists/ansi.html

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Read;

use crate::error::LoadError;

pub const STATE_RESOURCE: &str = "state.txt";
pub const COUNTY_RESOURCE: &str = "national_county.txt";

/// Pipe-separated state list, header `STATE|STUSAB|STATE_NAME`
pub static STATE_SOURCE: &str = include_str!("../data/state.txt");

/// Comma-separated county list, header `state,state_ansi,county_ansi,county_name`
pub static COUNTY_SOURCE: &str = include_str!("../data/national_county.txt");

/// Raw record from the state resource
#[derive(Debug, Deserialize)]
pub struct StateRecord {
    #[serde(rename = "STATE")]
    pub ansi_code: String,
    #[serde(rename = "STUSAB")]
    pub abbreviation: String,
    #[serde(rename = "STATE_NAME")]
    pub name: String,
}

/// Raw record from the county resource
#[derive(Debug, Deserialize)]
pub struct CountyRecord {
    #[serde(rename = "state")]
    pub state_abbreviation: String,
    pub state_ansi: String,
    pub county_ansi: String,
    pub county_name: String,
}

/// Deserialize every data row of a delimited resource, numbering rows from 1.
///
/// The first malformed row aborts the read; nothing after it is returned.
pub(crate) fn read_records<T, R>(
    resource: &'static str,
    delimiter: u8,
    reader: R,
) -> Result<Vec<(usize, T)>, LoadError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_reader(reader);

    reader
        .deserialize()
        .enumerate()
        .map(|(i, record)| {
            record
                .map(|r| (i + 1, r))
                .map_err(|e| LoadError::new(resource, i + 1, e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_state_rows() {
        let rows: Vec<(usize, StateRecord)> =
            read_records(STATE_RESOURCE, b'|', STATE_SOURCE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 57);

        let (row, first) = &rows[0];
        assert_eq!(*row, 1);
        assert_eq!(first.ansi_code, "01");
        assert_eq!(first.abbreviation, "AL");
        assert_eq!(first.name, "Alabama");
    }

    #[test]
    fn test_bundled_county_rows() {
        let rows: Vec<(usize, CountyRecord)> =
            read_records(COUNTY_RESOURCE, b',', COUNTY_SOURCE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3235);

        let (_, first) = &rows[0];
        assert_eq!(first.state_abbreviation, "AL");
        assert_eq!(first.state_ansi, "01");
        assert_eq!(first.county_ansi, "001");
        assert_eq!(first.county_name, "Autauga County");
    }

    #[test]
    fn test_malformed_row_reports_position() {
        let data = "STATE|STUSAB|STATE_NAME\n01|AL|Alabama\n02|AK\n";
        let err = read_records::<StateRecord, _>(STATE_RESOURCE, b'|', data.as_bytes())
            .unwrap_err();
        assert_eq!(err.resource, STATE_RESOURCE);
        assert_eq!(err.row, 2);
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let data = "STATE|STATE_NAME\n01|Alabama\n";
        let err = read_records::<StateRecord, _>(STATE_RESOURCE, b'|', data.as_bytes())
            .unwrap_err();
        assert_eq!(err.row, 1);
        assert!(err.reason.contains("STUSAB"), "{}", err.reason);
    }
}
