//! Candidate facilities as supplied by the dataset collaborator.

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A loosely typed numeric dataset cell.
///
/// Dataset exports mix numbers and text in the same column. Coercion happens
/// at the normalisation boundary through [`AttributeValue::as_number`].
///
/// # Examples
/// ```
/// use carefinder_core::AttributeValue;
///
/// assert_eq!(AttributeValue::from(4.5).as_number(), Some(4.5));
/// assert_eq!(AttributeValue::from(" 4.2 ").as_number(), Some(4.2));
/// assert_eq!(AttributeValue::from("n/a").as_number(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttributeValue {
    /// A numeric cell.
    Number(f64),
    /// A textual cell that may or may not hold a number.
    Text(String),
}

impl AttributeValue {
    /// Interpret the cell as a number.
    ///
    /// Numbers are returned as-is, including non-finite ones, so the caller can
    /// reject them. Text yields a value only when it parses to a finite float.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A facility that may be recommended to a visitor.
///
/// `location` uses `x` for longitude and `y` for latitude. `None` means the
/// address could not be resolved.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use carefinder_core::Facility;
///
/// let facility = Facility::new("St. Nicholas", "57 Campbell St")
///     .with_services("Eye Surgery, Dental")
///     .with_cost_level("Medium")
///     .with_quality_score(4.4)
///     .with_location(Coord { x: 3.39, y: 6.45 });
/// assert_eq!(facility.services.as_deref(), Some("Eye Surgery, Dental"));
/// assert!(facility.user_rating.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Facility {
    /// Display name.
    pub name: String,
    /// Postal address.
    pub address: String,
    /// Free-text list of offered services.
    pub services: Option<String>,
    /// Cost category label such as `"Low"` or `"Premium"`.
    pub cost_level: Option<String>,
    /// Curated quality score, nominally `3.0..=5.0`.
    pub quality_score: Option<AttributeValue>,
    /// Aggregate user rating, nominally `1.0..=5.0`.
    pub user_rating: Option<AttributeValue>,
    /// Resolved coordinates, if any.
    pub location: Option<Coord<f64>>,
}

impl Facility {
    /// Create a facility with only a name and address.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            services: None,
            cost_level: None,
            quality_score: None,
            user_rating: None,
            location: None,
        }
    }

    /// Set the offered services.
    #[must_use]
    pub fn with_services(mut self, services: impl Into<String>) -> Self {
        self.services = Some(services.into());
        self
    }

    /// Set the cost category label.
    #[must_use]
    pub fn with_cost_level(mut self, cost_level: impl Into<String>) -> Self {
        self.cost_level = Some(cost_level.into());
        self
    }

    /// Set the quality score.
    #[must_use]
    pub fn with_quality_score(mut self, quality: impl Into<AttributeValue>) -> Self {
        self.quality_score = Some(quality.into());
        self
    }

    /// Set the user rating.
    #[must_use]
    pub fn with_user_rating(mut self, rating: impl Into<AttributeValue>) -> Self {
        self.user_rating = Some(rating.into());
        self
    }

    /// Set the resolved location.
    #[must_use]
    pub const fn with_location(mut self, location: Coord<f64>) -> Self {
        self.location = Some(location);
        self
    }
}
