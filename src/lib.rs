//! Facade crate for the Carefinder facility recommendation engine.
//!
//! This crate re-exports the core scoring types and, behind the `http`
//! feature, the dataset loader and HTTP collaborators used to resolve
//! addresses and driving routes.

#![forbid(unsafe_code)]

pub use carefinder_core::{
    Antecedent, AttributeValue, EmptyStage, Facility, FacilityScorer, FuzzyInputs, FuzzyScorer,
    GeocodeError, Geocoder, Inference, InferenceEngine, InferenceError, InputVariable,
    LinguisticVariable, Preference, Query, QueryError, RankingConfig, RankingError,
    Recommendation, RouteError, RouteSummary, Router, Rule, RuleBase, Trapezoid, Universe,
    VariableRegistry, rank,
};

#[cfg(feature = "http")]
pub use carefinder_data::{
    CachedGeocoder, DatasetError, GeocodeCache, HttpGeocoder, HttpRouter, MapsConfig,
    load_facilities,
};
