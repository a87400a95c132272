//! Response types for the Geocoding and Directions web services.
//!
//! Only the fields the providers read are modelled; everything else in the
//! payload is ignored.
//!
//! See: <https://developers.google.com/maps/documentation/geocoding/requests-geocoding>
//! and <https://developers.google.com/maps/documentation/directions/get-directions>

use serde::Deserialize;

/// Status reported for a successful request.
pub(crate) const STATUS_OK: &str = "OK";

/// Status reported when the request was valid but matched nothing.
pub(crate) const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Directions status reported when an endpoint could not be geocoded.
pub(crate) const STATUS_NOT_FOUND: &str = "NOT_FOUND";

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Geocoding API response.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    /// Request status, e.g. `"OK"`, `"ZERO_RESULTS"` or `"REQUEST_DENIED"`.
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub location: LatLng,
}

/// Directions API response.
#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    /// Request status, e.g. `"OK"`, `"ZERO_RESULTS"` or `"NOT_FOUND"`.
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Route {
    #[serde(default)]
    pub legs: Vec<Leg>,
    pub overview_polyline: Option<Polyline>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Polyline {
    pub points: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Leg {
    pub distance: TextValue,
    pub duration: TextValue,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A measured quantity with its localised rendering.
#[derive(Debug, Deserialize)]
pub(crate) struct TextValue {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Step {
    #[serde(default)]
    pub html_instructions: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_geocode_success() {
        let json = r#"{
            "status": "OK",
            "results": [
                {"formatted_address": "Ikeja", "geometry": {"location": {"lat": 6.6018, "lng": 3.3515}}}
            ]
        }"#;

        let response: GeocodeResponse = serde_json::from_str(json).expect("should deserialise");

        assert_eq!(response.status, STATUS_OK);
        let first = response.results.first().expect("one result");
        assert_eq!(
            first.geometry.location,
            LatLng {
                lat: 6.6018,
                lng: 3.3515
            }
        );
    }

    #[test]
    fn deserialise_geocode_denied() {
        let json = r#"{
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        }"#;

        let response: GeocodeResponse = serde_json::from_str(json).expect("should deserialise");

        assert_eq!(response.status, "REQUEST_DENIED");
        assert_eq!(
            response.error_message.as_deref(),
            Some("The provided API key is invalid.")
        );
        assert!(response.results.is_empty());
    }

    #[test]
    fn deserialise_directions_route() {
        let json = r#"{
            "status": "OK",
            "routes": [{
                "summary": "Third Mainland Bridge",
                "overview_polyline": {"points": "a~l~Fjk~uOwHJy@P"},
                "legs": [{
                    "distance": {"text": "9.8 km", "value": 9810},
                    "duration": {"text": "21 mins", "value": 1260},
                    "steps": [
                        {"html_instructions": "Head <b>north</b>"},
                        {"html_instructions": "Turn <b>left</b> onto <b>Herbert Macaulay Way</b>"}
                    ]
                }]
            }]
        }"#;

        let response: DirectionsResponse = serde_json::from_str(json).expect("should deserialise");

        let route = response.routes.first().expect("one route");
        let leg = route.legs.first().expect("one leg");
        assert_eq!(leg.distance.text, "9.8 km");
        assert_eq!(leg.duration.text, "21 mins");
        assert_eq!(leg.steps.len(), 2);
        assert_eq!(
            route.overview_polyline.as_ref().map(|p| p.points.as_str()),
            Some("a~l~Fjk~uOwHJy@P")
        );
    }

    #[test]
    fn deserialise_directions_without_routes() {
        let json = r#"{"status": "ZERO_RESULTS"}"#;

        let response: DirectionsResponse = serde_json::from_str(json).expect("should deserialise");

        assert_eq!(response.status, STATUS_ZERO_RESULTS);
        assert!(response.routes.is_empty());
    }
}
