//! HTTP-based `Router` using the Directions web service.
//!
//! The [`Router`] trait is synchronous to keep the core library embeddable in
//! synchronous contexts. This provider bridges the async HTTP call to the
//! sync interface by blocking on a Tokio runtime internally.

use carefinder_core::{RouteError, RouteSummary, Router};
use geo::Coord;
use url::Url;

use super::html::strip_html;
use crate::maps::client::MapsClient;
use crate::maps::google::{DirectionsResponse, STATUS_NOT_FOUND, STATUS_OK, STATUS_ZERO_RESULTS};
use crate::maps::{MapsConfig, ProviderBuildError};

/// Endpoint path, relative to the configured base URL.
const DIRECTIONS_PATH: &str = "maps/api/directions/json";

/// Travel mode requested from the service.
const TRAVEL_MODE: &str = "driving";

/// [`Router`] that queries `{base_url}/maps/api/directions/json`.
///
/// Requests ask for a driving route departing now. The first leg of the
/// first route is summarised; `ZERO_RESULTS` and `NOT_FOUND` become
/// `Ok(None)`.
#[derive(Debug)]
pub struct HttpRouter {
    client: MapsClient,
    endpoint: Url,
}

/// Render a location as the `lat,lng` pair the service expects.
fn waypoint(location: Coord<f64>) -> String {
    format!("{},{}", location.y, location.x)
}

impl HttpRouter {
    /// Create a router for the service at `base_url` without an API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(MapsConfig::new(base_url))
    }

    /// Create a router with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: MapsConfig) -> Result<Self, ProviderBuildError> {
        let client = MapsClient::new(config)?;
        let endpoint = client.endpoint(DIRECTIONS_PATH)?;
        Ok(Self { client, endpoint })
    }

    async fn fetch(
        &self,
        from: Coord<f64>,
        to: Coord<f64>,
    ) -> Result<Option<RouteSummary>, RouteError> {
        let origin = waypoint(from);
        let destination = waypoint(to);
        let response: DirectionsResponse = self
            .client
            .get_json(
                &self.endpoint,
                &[
                    ("origin", origin.as_str()),
                    ("destination", destination.as_str()),
                    ("mode", TRAVEL_MODE),
                    ("departure_time", "now"),
                ],
            )
            .await?;
        convert_response(response)
    }
}

fn convert_response(response: DirectionsResponse) -> Result<Option<RouteSummary>, RouteError> {
    match response.status.as_str() {
        STATUS_OK => {}
        STATUS_ZERO_RESULTS | STATUS_NOT_FOUND => return Ok(None),
        _ => {
            return Err(RouteError::Service {
                message: response.error_message.unwrap_or_default(),
                status: response.status,
            });
        }
    }
    let Some(route) = response.routes.into_iter().next() else {
        return Ok(None);
    };
    let leg = route
        .legs
        .into_iter()
        .next()
        .ok_or_else(|| RouteError::Parse {
            message: "directions route has no legs".to_owned(),
        })?;
    Ok(Some(RouteSummary {
        distance_text: leg.distance.text,
        duration_text: leg.duration.text,
        polyline: route.overview_polyline.map(|line| line.points),
        instructions: leg
            .steps
            .iter()
            .map(|step| strip_html(&step.html_instructions))
            .filter(|text| !text.is_empty())
            .collect(),
    }))
}

impl Router for HttpRouter {
    fn route(
        &self,
        from: Coord<f64>,
        to: Coord<f64>,
    ) -> Result<Option<RouteSummary>, RouteError> {
        self.client.block_on(self.fetch(from, to))
    }
}
