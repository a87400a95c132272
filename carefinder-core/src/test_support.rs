//! Deterministic collaborators used by unit and behaviour tests.

use std::collections::HashMap;

use geo::Coord;

use crate::geocode::{GeocodeError, Geocoder};
use crate::query::Query;
use crate::route::{RouteError, RouteSummary, Router};
use crate::scorer::{Candidate, FacilityScorer};

/// `FacilityScorer` returning fixed scores by facility name.
///
/// Unlisted facilities score `0.0`.
#[derive(Debug, Clone, Default)]
pub struct TableScorer {
    scores: HashMap<String, f64>,
}

impl TableScorer {
    /// Build a scorer from `(name, score)` pairs.
    #[must_use]
    pub fn new<'a, I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        Self {
            scores: scores
                .into_iter()
                .map(|(name, score)| (name.to_owned(), score))
                .collect(),
        }
    }
}

impl FacilityScorer for TableScorer {
    fn score(&self, candidate: &Candidate<'_>, _query: &Query) -> f64 {
        self.scores
            .get(&candidate.facility.name)
            .copied()
            .unwrap_or_default()
    }
}

/// In-memory `Geocoder` keyed by exact address.
#[derive(Debug, Clone, Default)]
pub struct MemoryGeocoder {
    known: HashMap<String, Coord<f64>>,
    failing: Vec<String>,
}

impl MemoryGeocoder {
    /// Build a geocoder from `(address, location)` pairs.
    #[must_use]
    pub fn new<'a, I>(known: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Coord<f64>)>,
    {
        Self {
            known: known
                .into_iter()
                .map(|(address, location)| (address.to_owned(), location))
                .collect(),
            failing: Vec::new(),
        }
    }

    /// Make lookups of `address` fail with a service error.
    #[must_use]
    pub fn failing_on(mut self, address: &str) -> Self {
        self.failing.push(address.to_owned());
        self
    }
}

impl Geocoder for MemoryGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coord<f64>>, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        if self.failing.iter().any(|failing| failing == address) {
            return Err(GeocodeError::Service {
                status: "UNKNOWN_ERROR".to_owned(),
                message: format!("lookup of '{address}' failed"),
            });
        }
        Ok(self.known.get(address).copied())
    }
}

/// `Router` returning a one-step route, or failing on every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubRouter {
    fail: bool,
}

impl StubRouter {
    /// A router whose every request fails.
    #[must_use]
    pub const fn failing() -> Self {
        Self { fail: true }
    }
}

impl Router for StubRouter {
    fn route(
        &self,
        from: Coord<f64>,
        to: Coord<f64>,
    ) -> Result<Option<RouteSummary>, RouteError> {
        if self.fail {
            return Err(RouteError::Service {
                status: "REQUEST_DENIED".to_owned(),
                message: "stub router rejects every request".to_owned(),
            });
        }
        Ok(Some(RouteSummary {
            distance_text: "1 km".to_owned(),
            duration_text: "5 mins".to_owned(),
            polyline: None,
            instructions: vec![format!(
                "Drive from {:.4},{:.4} to {:.4},{:.4}",
                from.y, from.x, to.y, to.x
            )],
        }))
    }
}
