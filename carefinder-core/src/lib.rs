//! Core scoring engine for Carefinder facility recommendations.
//!
//! Facilities are scored for a visitor's [`Query`] by a Mamdani fuzzy
//! inference engine over seven linguistic variables, then filtered, sorted
//! and truncated by [`rank`]. The crate performs no I/O: addresses are
//! resolved by a [`Geocoder`] and directions fetched by a [`Router`], both
//! supplied by the caller.
//!
//! # Examples
//!
//! ```
//! use geo::Coord;
//! use carefinder_core::{Facility, FuzzyScorer, Query, RankingConfig, rank};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let facilities = vec![
//!     Facility::new("Lagoon Eye Centre", "12 Awolowo Rd")
//!         .with_services("Eye Surgery, Optometry")
//!         .with_cost_level("Low")
//!         .with_quality_score(4.8)
//!         .with_user_rating(4.5)
//!         .with_location(Coord { x: 3.4219, y: 6.4474 }),
//! ];
//! let query = Query::parse("eye surgery", "Low", "High")?
//!     .with_location(Coord { x: 3.4219, y: 6.4474 })?;
//! let ranked = rank(&facilities, &query, &FuzzyScorer::default(), &RankingConfig::default())?;
//! assert!(ranked.iter().all(|r| r.recommendation_score > 0.6));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod distance;
mod facility;
pub mod fuzzy;
mod geocode;
mod normalise;
mod query;
mod ranking;
mod route;
mod scorer;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use distance::{distance_km, great_circle_km, validate_location};
pub use facility::{AttributeValue, Facility};
pub use fuzzy::{
    Antecedent, Consequent, FuzzyInputs, Inference, InferenceEngine, InferenceError, InputVariable,
    LinguisticVariable, ParseInputVariableError, RECOMMENDATION, Rule, RuleBase, RuleError,
    Trapezoid, Universe, VariableError, VariableRegistry,
};
pub use geocode::{GeocodeError, Geocoder, resolve_locations};
pub use normalise::{
    DEFAULT_COST, DEFAULT_PREFERENCE, DEFAULT_PROXIMITY_SCALE_KM, DEFAULT_QUALITY,
    DEFAULT_USER_RATING, NormaliseError, cost_value, fuzzy_inputs, preference_value, proximity,
    quality_value, service_match, user_rating_value,
};
pub use query::{ParsePreferenceError, Preference, Query, QueryError};
pub use ranking::{EmptyStage, RankingConfig, RankingError, Recommendation, rank};
pub use route::{RouteError, RouteSummary, Router, routes_for};
pub use scorer::{Candidate, FacilityScorer, FuzzyScorer};
