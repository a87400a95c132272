//! Driving directions to recommended facilities.
//!
//! Routes are looked up only for ranked results and only when both the
//! visitor and the facility have resolved locations.

use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ranking::Recommendation;

/// Summary of one driving route.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteSummary {
    /// Human-readable distance, e.g. `"4.2 km"`.
    pub distance_text: String,
    /// Human-readable duration, e.g. `"12 mins"`.
    pub duration_text: String,
    /// Encoded overview polyline, when supplied.
    pub polyline: Option<String>,
    /// Plain-text turn-by-turn instructions.
    pub instructions: Vec<String>,
}

/// Errors from [`Router::route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The request exceeded its time budget.
    #[error("routing request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL, without credentials.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with an HTTP error status.
    #[error("routing request to {url} failed with HTTP {status}: {message}")]
    Http {
        /// Requested URL, without credentials.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request could not be delivered.
    #[error("routing request to {url} failed: {message}")]
    Network {
        /// Requested URL, without credentials.
        url: String,
        /// Error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    Parse {
        /// Error description.
        message: String,
    },
    /// The service rejected the request.
    #[error("routing service returned {status}: {message}")]
    Service {
        /// Service status code, e.g. `REQUEST_DENIED`.
        status: String,
        /// Error description.
        message: String,
    },
}

/// Compute a driving route between two resolved locations.
///
/// `Ok(None)` means the service found no route.
pub trait Router {
    /// Return the route from `from` to `to`, if one exists.
    fn route(
        &self,
        from: Coord<f64>,
        to: Coord<f64>,
    ) -> Result<Option<RouteSummary>, RouteError>;
}

impl<R: Router + ?Sized> Router for &R {
    fn route(
        &self,
        from: Coord<f64>,
        to: Coord<f64>,
    ) -> Result<Option<RouteSummary>, RouteError> {
        (**self).route(from, to)
    }
}

/// Route from `origin` to each recommendation.
///
/// Entries are `None` when the origin or the facility is unresolved or when
/// the router fails; failures are logged.
pub fn routes_for<R>(
    router: &R,
    origin: Option<Coord<f64>>,
    recommendations: &[Recommendation],
) -> Vec<Option<RouteSummary>>
where
    R: Router + ?Sized,
{
    recommendations
        .iter()
        .map(|recommendation| {
            let (from, to) = origin.zip(recommendation.location)?;
            router.route(from, to).unwrap_or_else(|err| {
                log::warn!("no route to '{}': {err}", recommendation.name);
                None
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubRouter;
    use rstest::rstest;

    fn recommendation(name: &str, location: Option<Coord<f64>>) -> Recommendation {
        Recommendation {
            name: name.to_owned(),
            address: "Lagos".to_owned(),
            services: None,
            cost_level: None,
            quality_score: None,
            user_rating: None,
            recommendation_score: 0.5,
            distance_km: None,
            location,
        }
    }

    #[rstest]
    fn routes_only_resolved_pairs() {
        let origin = Coord { x: 3.38, y: 6.52 };
        let ranked = [
            recommendation("A", Some(Coord { x: 3.39, y: 6.45 })),
            recommendation("B", None),
        ];
        let routes = routes_for(&StubRouter::default(), Some(origin), &ranked);
        assert!(routes.first().is_some_and(Option::is_some));
        assert!(routes.get(1).is_some_and(Option::is_none));
        let unrouted = routes_for(&StubRouter::default(), None, &ranked);
        assert!(unrouted.iter().all(Option::is_none));
    }

    #[rstest]
    fn router_failures_become_none() {
        let origin = Coord { x: 3.38, y: 6.52 };
        let ranked = [recommendation("A", Some(Coord { x: 3.39, y: 6.45 }))];
        let routes = routes_for(&StubRouter::failing(), Some(origin), &ranked);
        assert_eq!(routes, [None]);
    }
}
