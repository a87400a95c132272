//! Visitor queries and their validation.

use std::fmt;
use std::str::FromStr;

use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::distance::validate_location;

/// A visitor's cost or quality preference.
///
/// # Examples
/// ```
/// use carefinder_core::Preference;
///
/// let preference: Preference = " high ".parse().expect("valid preference");
/// assert_eq!(preference, Preference::High);
/// assert_eq!(preference.value(), 1.0);
/// assert!("extreme".parse::<Preference>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Preference {
    /// Prefers the lower end.
    Low,
    /// No strong preference.
    #[default]
    Medium,
    /// Prefers the upper end.
    High,
}

impl Preference {
    /// Every preference, from lowest to highest.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Crisp value fed to the preference variables.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Low => 0.33,
            Self::Medium => 0.66,
            Self::High => 1.0,
        }
    }

    /// Canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label is not one of `Low`, `Medium` or `High`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised preference '{0}' (expected Low, Medium or High)")]
pub struct ParsePreferenceError(pub String);

impl FromStr for Preference {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Self::ALL
            .into_iter()
            .find(|preference| preference.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| ParsePreferenceError(s.to_owned()))
    }
}

/// Errors raised while validating a [`Query`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// A preference was not one of `Low`, `Medium` or `High`.
    #[error("invalid {field} preference '{value}'")]
    InvalidPreference {
        /// Which preference was rejected.
        field: &'static str,
        /// The rejected label.
        value: String,
    },
    /// The requested service was blank.
    #[error("a service must be requested")]
    MissingServiceQuery,
    /// The visitor's coordinates were out of range.
    #[error("location ({lat}, {lon}) is not a valid latitude/longitude pair")]
    InvalidLocation {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lon: f64,
    },
}

/// A validated recommendation request.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use carefinder_core::{Preference, Query};
///
/// # fn main() -> Result<(), carefinder_core::QueryError> {
/// let query = Query::parse("  Eye Surgery ", "low", "High")?
///     .with_location(Coord { x: 3.38, y: 6.52 })?;
/// assert_eq!(query.service(), "Eye Surgery");
/// assert_eq!(query.cost_preference(), Preference::Low);
/// assert!(query.location().is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Query {
    service: String,
    cost_preference: Preference,
    quality_preference: Preference,
    location: Option<Coord<f64>>,
}

impl Query {
    /// Validate and construct a query.
    ///
    /// # Errors
    /// Returns [`QueryError::MissingServiceQuery`] for a blank service and
    /// [`QueryError::InvalidLocation`] for out-of-range coordinates.
    pub fn new(
        service: &str,
        cost_preference: Preference,
        quality_preference: Preference,
        location: Option<Coord<f64>>,
    ) -> Result<Self, QueryError> {
        let trimmed = service.trim();
        if trimmed.is_empty() {
            return Err(QueryError::MissingServiceQuery);
        }
        let query = Self {
            service: trimmed.to_owned(),
            cost_preference,
            quality_preference,
            location: None,
        };
        match location {
            Some(location) => query.with_location(location),
            None => Ok(query),
        }
    }

    /// Validate raw preference labels and construct a query without location.
    ///
    /// # Errors
    /// Returns [`QueryError::InvalidPreference`] for an unknown label and
    /// [`QueryError::MissingServiceQuery`] for a blank service.
    pub fn parse(
        service: &str,
        cost_preference: &str,
        quality_preference: &str,
    ) -> Result<Self, QueryError> {
        let parse = |field: &'static str, value: &str| {
            value
                .parse::<Preference>()
                .map_err(|_| QueryError::InvalidPreference {
                    field,
                    value: value.to_owned(),
                })
        };
        let cost = parse("cost", cost_preference)?;
        let quality = parse("quality", quality_preference)?;
        Self::new(service, cost, quality, None)
    }

    /// Attach the visitor's resolved location.
    ///
    /// # Errors
    /// Returns [`QueryError::InvalidLocation`] for out-of-range coordinates.
    pub fn with_location(mut self, location: Coord<f64>) -> Result<Self, QueryError> {
        validate_location(location).map_err(|_| QueryError::InvalidLocation {
            lat: location.y,
            lon: location.x,
        })?;
        self.location = Some(location);
        Ok(self)
    }

    /// Requested service, trimmed.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Cost preference.
    #[must_use]
    pub const fn cost_preference(&self) -> Preference {
        self.cost_preference
    }

    /// Quality preference.
    #[must_use]
    pub const fn quality_preference(&self) -> Preference {
        self.quality_preference
    }

    /// Resolved visitor location, if any.
    #[must_use]
    pub const fn location(&self) -> Option<Coord<f64>> {
        self.location
    }
}
