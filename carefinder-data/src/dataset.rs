//! Facility dataset loading.
//!
//! The dataset is a JSON array of records keyed by the column headers of the
//! hospital spreadsheet it was exported from:
//!
//! ```json
//! [
//!   {
//!     "Name": "Eko Eye Centre",
//!     "Full Address": "12 Awolowo Road, Ikoyi",
//!     "Services": "Eye Surgery, Optometry",
//!     "Cost Level": "Medium",
//!     "Quality Score": 4.6,
//!     "User Rating": "4.2"
//!   }
//! ]
//! ```
//!
//! Numeric columns may hold numbers or text; coercion happens later, when the
//! record is normalised for scoring.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use carefinder_core::{AttributeValue, Facility};
use serde::Deserialize;
use thiserror::Error;

/// Address recorded for facilities whose dataset row has none.
const UNKNOWN_ADDRESS: &str = "Unknown";

/// Errors raised while loading the facility dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// No file exists at the configured path.
    #[error("facility dataset not found at {path}")]
    NotFound {
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// The file exists but could not be read.
    #[error("failed to read facility dataset at {path}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file is not a JSON array of records.
    #[error("failed to parse facility dataset at {path}")]
    Parse {
        /// Path that was parsed.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct Record {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Full Address")]
    address: Option<String>,
    #[serde(rename = "Services")]
    services: Option<String>,
    #[serde(rename = "Cost Level")]
    cost_level: Option<String>,
    #[serde(rename = "Quality Score")]
    quality_score: Option<AttributeValue>,
    #[serde(rename = "User Rating")]
    user_rating: Option<AttributeValue>,
}

/// Treat blank cells like absent ones.
fn present(cell: Option<String>) -> Option<String> {
    cell.filter(|text| !text.trim().is_empty())
}

impl Record {
    fn into_facility(self, row: usize) -> Option<Facility> {
        let Some(name) = present(self.name) else {
            log::warn!("dropping dataset row {row}: missing Name");
            return None;
        };
        let Some(services) = present(self.services) else {
            log::warn!("dropping dataset row {row} ('{name}'): missing Services");
            return None;
        };
        let Some(cost_level) = present(self.cost_level) else {
            log::warn!("dropping dataset row {row} ('{name}'): missing Cost Level");
            return None;
        };
        let address = present(self.address).unwrap_or_else(|| UNKNOWN_ADDRESS.to_owned());
        Some(Facility {
            name,
            address,
            services: Some(services),
            cost_level: Some(cost_level),
            quality_score: self.quality_score,
            user_rating: self.user_rating,
            location: None,
        })
    }
}

/// Parse facilities from the JSON text of a dataset.
///
/// Rows without a name, services or cost level are dropped with a warning.
///
/// # Errors
///
/// Returns the JSON error when `json` is not an array of objects.
///
/// # Examples
///
/// ```
/// use carefinder_data::parse_facilities;
///
/// let facilities = parse_facilities(
///     r#"[{"Name": "Yaba Clinic", "Services": "Dental", "Cost Level": "Low"},
///         {"Name": "No Services", "Cost Level": "Low"}]"#,
/// )?;
/// assert_eq!(facilities.len(), 1);
/// assert_eq!(facilities[0].address, "Unknown");
/// # Ok::<(), serde_json::Error>(())
/// ```
pub fn parse_facilities(json: &str) -> Result<Vec<Facility>, serde_json::Error> {
    let records: Vec<Record> = serde_json::from_str(json)?;
    let total = records.len();
    let facilities: Vec<Facility> = records
        .into_iter()
        .enumerate()
        .filter_map(|(row, record)| record.into_facility(row))
        .collect();
    log::debug!("loaded {} of {total} dataset rows", facilities.len());
    Ok(facilities)
}

/// Load the facility dataset stored at `path`.
///
/// # Errors
///
/// Returns [`DatasetError`] when the file is missing, unreadable, or not a
/// JSON array of records.
pub fn load_facilities(path: &Utf8Path) -> Result<Vec<Facility>, DatasetError> {
    let text = carefinder_fs::read_utf8_if_exists(path)
        .map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| DatasetError::NotFound {
            path: path.to_path_buf(),
        })?;
    parse_facilities(&text).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
