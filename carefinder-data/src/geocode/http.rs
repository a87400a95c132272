//! HTTP geocoder backed by the Geocoding web service.

use carefinder_core::{GeocodeError, Geocoder};
use geo::Coord;
use url::Url;

use crate::maps::client::MapsClient;
use crate::maps::google::{GeocodeResponse, STATUS_OK, STATUS_ZERO_RESULTS};
use crate::maps::{MapsConfig, ProviderBuildError};

/// Endpoint path, relative to the configured base URL.
const GEOCODE_PATH: &str = "maps/api/geocode/json";

/// [`Geocoder`] that queries `{base_url}/maps/api/geocode/json`.
///
/// The first result's `geometry.location` is returned. `ZERO_RESULTS`
/// becomes `Ok(None)`; any other non-`OK` status is a
/// [`GeocodeError::Service`]. Requests are issued without retries.
///
/// # Example
///
/// ```no_run
/// use carefinder_core::Geocoder;
/// use carefinder_data::{HttpGeocoder, MapsConfig};
///
/// let config = MapsConfig::default().with_api_key("YOUR_KEY");
/// let geocoder = HttpGeocoder::with_config(config)?;
/// let location = geocoder.geocode("Ikeja, Lagos, Nigeria")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct HttpGeocoder {
    client: MapsClient,
    endpoint: Url,
}

impl HttpGeocoder {
    /// Create a geocoder for the service at `base_url` without an API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(MapsConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: MapsConfig) -> Result<Self, ProviderBuildError> {
        let client = MapsClient::new(config)?;
        let endpoint = client.endpoint(GEOCODE_PATH)?;
        Ok(Self { client, endpoint })
    }

    async fn fetch(&self, address: &str) -> Result<Option<Coord<f64>>, GeocodeError> {
        let response: GeocodeResponse = self
            .client
            .get_json(&self.endpoint, &[("address", address)])
            .await?;
        convert_response(response)
    }
}

fn convert_response(response: GeocodeResponse) -> Result<Option<Coord<f64>>, GeocodeError> {
    match response.status.as_str() {
        STATUS_OK => Ok(response.results.first().map(|result| Coord {
            x: result.geometry.location.lng,
            y: result.geometry.location.lat,
        })),
        STATUS_ZERO_RESULTS => Ok(None),
        _ => Err(GeocodeError::Service {
            message: response.error_message.unwrap_or_default(),
            status: response.status,
        }),
    }
}

impl Geocoder for HttpGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coord<f64>>, GeocodeError> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        self.client.block_on(self.fetch(trimmed))
    }
}
