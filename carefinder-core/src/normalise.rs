//! Map raw facility and query fields onto the crisp inference inputs.
//!
//! Every function here is total over well-formed data: missing or
//! unparsable cells fall back to documented defaults. Only values that are
//! present but unusable, such as a non-finite rating, surface as
//! [`NormaliseError`].

use thiserror::Error;

use crate::facility::{AttributeValue, Facility};
use crate::fuzzy::{FuzzyInputs, InputVariable};
use crate::query::{Preference, Query};

/// Quality assumed when a facility has no usable score.
pub const DEFAULT_QUALITY: f64 = 3.1;
/// User rating assumed when a facility has no usable rating.
pub const DEFAULT_USER_RATING: f64 = 3.0;
/// Cost assumed for missing or unrecognised cost labels.
pub const DEFAULT_COST: f64 = 1.0;
/// Preference value assumed for unrecognised preference labels.
pub const DEFAULT_PREFERENCE: f64 = 0.33;
/// Distance in kilometres over which proximity decays by a factor of `e`.
pub const DEFAULT_PROXIMITY_SCALE_KM: f64 = 2.0;

/// Errors raised while normalising one candidate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormaliseError {
    /// A numeric attribute was NaN or infinite.
    #[error("attribute '{field}' is not finite ({value})")]
    NonFinite {
        /// Attribute name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A coordinate lay outside the WGS84 range.
    #[error("coordinates ({lat}, {lon}) are out of range")]
    InvalidCoordinates {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lon: f64,
    },
}

/// Textual match between a requested service and a facility's services.
///
/// Returns `1.0` when the whole query occurs in the services text, `0.5`
/// when any query word does, and `0.0` otherwise. Matching ignores case and
/// surrounding whitespace.
///
/// # Examples
/// ```
/// use carefinder_core::service_match;
///
/// assert_eq!(service_match("eye surgery", Some("Eye Surgery, Dental")), 1.0);
/// assert_eq!(service_match("eye care", Some("General eye clinic")), 0.5);
/// assert_eq!(service_match("dental", Some("Eye Surgery")), 0.0);
/// assert_eq!(service_match("dental", None), 0.0);
/// ```
#[must_use]
pub fn service_match(query: &str, services: Option<&str>) -> f64 {
    let wanted = query.trim().to_lowercase();
    let offered = services.unwrap_or_default().trim().to_lowercase();
    if wanted.is_empty() || offered.is_empty() {
        return 0.0;
    }
    if offered.contains(&wanted) {
        1.0
    } else if wanted.split_whitespace().any(|token| offered.contains(token)) {
        0.5
    } else {
        0.0
    }
}

/// Crisp cost for a cost category label.
///
/// # Examples
/// ```
/// use carefinder_core::cost_value;
///
/// assert_eq!(cost_value(Some("Premium")), 3.0);
/// assert_eq!(cost_value(Some(" medium ")), 2.0);
/// assert_eq!(cost_value(Some("Deluxe")), 1.0);
/// ```
#[must_use]
pub fn cost_value(label: Option<&str>) -> f64 {
    let Some(trimmed) = label.map(str::trim) else {
        return DEFAULT_COST;
    };
    [("low", 1.0), ("medium", 2.0), ("high", 3.0), ("premium", 3.0)]
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        .map_or(DEFAULT_COST, |(_, value)| value)
}

fn numeric(
    field: &'static str,
    cell: Option<&AttributeValue>,
    default: f64,
) -> Result<f64, NormaliseError> {
    match cell.and_then(AttributeValue::as_number) {
        None => Ok(default),
        Some(value) if value.is_finite() => Ok(value),
        Some(value) => Err(NormaliseError::NonFinite { field, value }),
    }
}

/// Crisp quality score, defaulting to [`DEFAULT_QUALITY`].
///
/// # Errors
/// Returns [`NormaliseError::NonFinite`] for a NaN or infinite number.
pub fn quality_value(cell: Option<&AttributeValue>) -> Result<f64, NormaliseError> {
    numeric("quality_score", cell, DEFAULT_QUALITY)
}

/// Crisp user rating, defaulting to [`DEFAULT_USER_RATING`].
///
/// # Errors
/// Returns [`NormaliseError::NonFinite`] for a NaN or infinite number.
pub fn user_rating_value(cell: Option<&AttributeValue>) -> Result<f64, NormaliseError> {
    numeric("user_rating", cell, DEFAULT_USER_RATING)
}

/// Crisp value of a raw preference label, defaulting to
/// [`DEFAULT_PREFERENCE`] when the label is not recognised.
#[must_use]
pub fn preference_value(label: &str) -> f64 {
    label
        .parse::<Preference>()
        .map_or(DEFAULT_PREFERENCE, Preference::value)
}

/// Exponential closeness `exp(-distance / scale)`; `0.0` when unresolved.
///
/// # Examples
/// ```
/// use carefinder_core::proximity;
///
/// assert_eq!(proximity(Some(0.0), 2.0), 1.0);
/// assert!((proximity(Some(2.0), 2.0) - (-1.0_f64).exp()).abs() < 1e-12);
/// assert_eq!(proximity(None, 2.0), 0.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "exponential distance decay")]
pub fn proximity(distance_km: Option<f64>, scale_km: f64) -> f64 {
    match distance_km {
        Some(distance) if distance.is_finite() && scale_km > 0.0 => {
            (-distance.max(0.0) / scale_km).exp()
        }
        _ => 0.0,
    }
}

/// Assemble the seven crisp inputs for one candidate.
///
/// # Errors
/// Returns [`NormaliseError::NonFinite`] when the quality score or user rating
/// is a non-finite number.
pub fn fuzzy_inputs(
    facility: &Facility,
    query: &Query,
    distance_km: Option<f64>,
    proximity_scale_km: f64,
) -> Result<FuzzyInputs, NormaliseError> {
    Ok(FuzzyInputs::new()
        .with_input(
            InputVariable::ServiceMatch,
            service_match(query.service(), facility.services.as_deref()),
        )
        .with_input(
            InputVariable::Cost,
            cost_value(facility.cost_level.as_deref()),
        )
        .with_input(
            InputVariable::Quality,
            quality_value(facility.quality_score.as_ref())?,
        )
        .with_input(
            InputVariable::UserRating,
            user_rating_value(facility.user_rating.as_ref())?,
        )
        .with_input(InputVariable::UserCostPref, query.cost_preference().value())
        .with_input(
            InputVariable::UserQualityPref,
            query.quality_preference().value(),
        )
        .with_input(
            InputVariable::Proximity,
            proximity(distance_km, proximity_scale_km),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("eye surgery", Some("Eye Surgery, Dental"), 1.0)]
    #[case("  EYE SURGERY ", Some("eye surgery"), 1.0)]
    #[case("eye care", Some("General eye clinic"), 0.5)]
    #[case("dental", Some("Eye Surgery"), 0.0)]
    #[case("", Some("Eye Surgery"), 0.0)]
    #[case("dental", Some("   "), 0.0)]
    #[case("dental", None, 0.0)]
    fn matches_services(
        #[case] query: &str,
        #[case] services: Option<&str>,
        #[case] expected: f64,
    ) {
        assert_eq!(service_match(query, services), expected);
    }

    #[rstest]
    #[case(Some("Low"), 1.0)]
    #[case(Some("Medium"), 2.0)]
    #[case(Some("HIGH"), 3.0)]
    #[case(Some("Premium"), 3.0)]
    #[case(Some("Deluxe"), 1.0)]
    #[case(None, 1.0)]
    fn maps_cost_labels(#[case] label: Option<&str>, #[case] expected: f64) {
        assert_eq!(cost_value(label), expected);
    }

    #[rstest]
    #[case(None, DEFAULT_QUALITY)]
    #[case(Some(AttributeValue::Number(4.7)), 4.7)]
    #[case(Some(AttributeValue::from("4.2")), 4.2)]
    #[case(Some(AttributeValue::from("unrated")), DEFAULT_QUALITY)]
    fn coerces_quality(#[case] cell: Option<AttributeValue>, #[case] expected: f64) {
        assert_eq!(quality_value(cell.as_ref()), Ok(expected));
    }

    #[rstest]
    fn defaults_user_rating() {
        assert_eq!(user_rating_value(None), Ok(DEFAULT_USER_RATING));
    }

    #[rstest]
    fn rejects_non_finite_rating() {
        let cell = AttributeValue::Number(f64::INFINITY);
        assert_eq!(
            user_rating_value(Some(&cell)),
            Err(NormaliseError::NonFinite {
                field: "user_rating",
                value: f64::INFINITY,
            })
        );
    }

    #[rstest]
    #[case("Low", 0.33)]
    #[case("medium", 0.66)]
    #[case("High", 1.0)]
    #[case("Extreme", DEFAULT_PREFERENCE)]
    fn maps_preference_labels(#[case] label: &str, #[case] expected: f64) {
        assert_eq!(preference_value(label), expected);
    }

    #[rstest]
    #[case(Some(0.0), 1.0)]
    #[case(None, 0.0)]
    #[case(Some(f64::INFINITY), 0.0)]
    fn decays_proximity(#[case] distance: Option<f64>, #[case] expected: f64) {
        assert_eq!(proximity(distance, DEFAULT_PROXIMITY_SCALE_KM), expected);
    }

    #[rstest]
    fn two_kilometres_is_one_scale_length() {
        let value = proximity(Some(2.0), DEFAULT_PROXIMITY_SCALE_KM);
        assert!((value - 0.367_879_441).abs() < 1e-6);
    }

    #[rstest]
    fn assembles_every_input() {
        let facility = Facility::new("Clinic", "1 Marina")
            .with_services("Dental, Eye Surgery")
            .with_cost_level("Medium")
            .with_quality_score("4.5")
            .with_user_rating(4.0);
        let query = Query::parse("dental", "Low", "High").expect("valid query");
        let inputs = fuzzy_inputs(&facility, &query, Some(0.0), 2.0).expect("finite inputs");
        assert_eq!(inputs.len(), InputVariable::ALL.len());
        assert_eq!(inputs.get("service_match"), Some(1.0));
        assert_eq!(inputs.get("cost"), Some(2.0));
        assert_eq!(inputs.get("quality"), Some(4.5));
        assert_eq!(inputs.get("user_rating"), Some(4.0));
        assert_eq!(inputs.get("user_cost_pref"), Some(0.33));
        assert_eq!(inputs.get("user_quality_pref"), Some(1.0));
        assert_eq!(inputs.get("proximity"), Some(1.0));
    }
}
