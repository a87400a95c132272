//! Score candidate facilities for a query.
//!
//! The [`FacilityScorer`] trait assigns a recommendation score to a
//! [`Facility`](crate::Facility) for a validated [`Query`].

use crate::facility::Facility;
use crate::fuzzy::InferenceEngine;
use crate::normalise::{DEFAULT_PROXIMITY_SCALE_KM, fuzzy_inputs};
use crate::query::Query;

/// A facility together with its precomputed distance from the visitor.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The facility being scored.
    pub facility: &'a Facility,
    /// Great-circle distance in kilometres, `None` when unresolved.
    pub distance_km: Option<f64>,
}

/// Calculate a recommendation score for a candidate.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so candidates can be
/// scored in parallel. The method is infallible; implementers return `0.0`
/// when a candidate cannot be scored.
///
/// Use [`FacilityScorer::sanitise`] to keep scores finite and within
/// `0.0..=1.0`.
///
/// # Examples
///
/// ```rust
/// use carefinder_core::{Candidate, Facility, FacilityScorer, Query};
///
/// struct Flat;
///
/// impl FacilityScorer for Flat {
///     fn score(&self, _candidate: &Candidate<'_>, _query: &Query) -> f64 {
///         0.5
///     }
/// }
///
/// let facility = Facility::new("Clinic", "1 Marina");
/// let query = Query::parse("dental", "Low", "High").expect("valid query");
/// let candidate = Candidate { facility: &facility, distance_km: None };
/// assert_eq!(Flat.score(&candidate, &query), 0.5);
/// ```
pub trait FacilityScorer: Send + Sync {
    /// Return a score for `candidate` according to `query`.
    fn score(&self, candidate: &Candidate<'_>, query: &Query) -> f64;

    /// Clamp and validate a raw score.
    ///
    /// Returns `0.0` for non-finite values and clamps to `0.0..=1.0`.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.clamp(0.0, 1.0)
    }
}

/// Scores candidates with the fuzzy inference engine.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyScorer<'e> {
    engine: &'e InferenceEngine,
    proximity_scale_km: f64,
}

impl Default for FuzzyScorer<'static> {
    fn default() -> Self {
        Self::new(InferenceEngine::shared(), DEFAULT_PROXIMITY_SCALE_KM)
    }
}

impl<'e> FuzzyScorer<'e> {
    /// Score with `engine`, decaying proximity over `proximity_scale_km`.
    #[must_use]
    pub const fn new(engine: &'e InferenceEngine, proximity_scale_km: f64) -> Self {
        Self {
            engine,
            proximity_scale_km,
        }
    }

    /// The engine used for inference.
    #[must_use]
    pub const fn engine(&self) -> &'e InferenceEngine {
        self.engine
    }
}

impl FacilityScorer for FuzzyScorer<'_> {
    fn score(&self, candidate: &Candidate<'_>, query: &Query) -> f64 {
        let facility = candidate.facility;
        let inputs = match fuzzy_inputs(
            facility,
            query,
            candidate.distance_km,
            self.proximity_scale_km,
        ) {
            Ok(inputs) => inputs,
            Err(err) => {
                log::warn!("scoring '{}' as 0.0: {err}", facility.name);
                return 0.0;
            }
        };
        match self.engine.infer(&inputs) {
            Ok(score) => Self::sanitise(score),
            Err(err) => {
                log::warn!("scoring '{}' as 0.0: {err}", facility.name);
                0.0
            }
        }
    }
}
