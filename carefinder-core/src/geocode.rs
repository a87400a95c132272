//! Resolve postal addresses to coordinates.
//!
//! The [`Geocoder`] trait abstracts the address lookup performed before
//! ranking. Lookups never fail a request: both `Ok(None)` and `Err` leave the
//! address unresolved, and the caller proceeds without coordinates.

use geo::Coord;
use thiserror::Error;

use crate::facility::Facility;

/// Errors from [`Geocoder::geocode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The address was blank.
    #[error("cannot geocode a blank address")]
    EmptyAddress,
    /// The request exceeded its time budget.
    #[error("geocoding request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL, without credentials.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with an HTTP error status.
    #[error("geocoding request to {url} failed with HTTP {status}: {message}")]
    Http {
        /// Requested URL, without credentials.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request could not be delivered.
    #[error("geocoding request to {url} failed: {message}")]
    Network {
        /// Requested URL, without credentials.
        url: String,
        /// Error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse geocoding response: {message}")]
    Parse {
        /// Error description.
        message: String,
    },
    /// The service rejected the request.
    #[error("geocoding service returned {status}: {message}")]
    Service {
        /// Service status code, e.g. `REQUEST_DENIED`.
        status: String,
        /// Error description.
        message: String,
    },
}

/// Look up coordinates for a postal address.
///
/// `Ok(None)` means the service knows no match for the address.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use carefinder_core::{GeocodeError, Geocoder};
///
/// struct Fixed;
///
/// impl Geocoder for Fixed {
///     fn geocode(&self, address: &str) -> Result<Option<Coord<f64>>, GeocodeError> {
///         Ok((address == "Ikeja").then_some(Coord { x: 3.35, y: 6.60 }))
///     }
/// }
///
/// assert!(Fixed.geocode("Ikeja")?.is_some());
/// assert!(Fixed.geocode("Atlantis")?.is_none());
/// # Ok::<(), GeocodeError>(())
/// ```
pub trait Geocoder {
    /// Return the coordinates of `address`, if known.
    fn geocode(&self, address: &str) -> Result<Option<Coord<f64>>, GeocodeError>;

    /// Resolve `address`, logging and discarding failures.
    fn resolve(&self, address: &str) -> Option<Coord<f64>> {
        match self.geocode(address) {
            Ok(location) => location,
            Err(err) => {
                log::warn!("leaving '{address}' unresolved: {err}");
                None
            }
        }
    }
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn geocode(&self, address: &str) -> Result<Option<Coord<f64>>, GeocodeError> {
        (**self).geocode(address)
    }
}

/// Fill in missing facility locations through `geocoder`.
///
/// Facilities that already carry a location are left untouched. Returns the
/// number of facilities that remain unresolved.
pub fn resolve_locations<G>(facilities: &mut [Facility], geocoder: &G) -> usize
where
    G: Geocoder + ?Sized,
{
    let mut unresolved = 0;
    for facility in facilities.iter_mut().filter(|f| f.location.is_none()) {
        facility.location = geocoder.resolve(&facility.address);
        if facility.location.is_none() {
            unresolved += 1;
        }
    }
    if unresolved > 0 {
        log::info!("{unresolved} facilities have no resolved location");
    }
    unresolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryGeocoder;
    use rstest::{fixture, rstest};

    const YABA: Coord<f64> = Coord { x: 3.38, y: 6.51 };

    #[fixture]
    fn geocoder() -> MemoryGeocoder {
        MemoryGeocoder::new([("Yaba", YABA)]).failing_on("Broken")
    }

    #[rstest]
    fn resolve_discards_errors(geocoder: MemoryGeocoder) {
        assert_eq!(geocoder.resolve("Yaba"), Some(YABA));
        assert_eq!(geocoder.resolve("Atlantis"), None);
        assert!(geocoder.geocode("Broken").is_err());
        assert_eq!(geocoder.resolve("Broken"), None);
    }

    #[rstest]
    fn fills_missing_locations_only(geocoder: MemoryGeocoder) {
        let preset = Coord { x: 3.0, y: 6.0 };
        let mut facilities = vec![
            Facility::new("A", "Yaba"),
            Facility::new("B", "Broken"),
            Facility::new("C", "Atlantis").with_location(preset),
        ];
        let unresolved = resolve_locations(&mut facilities, &geocoder);
        assert_eq!(unresolved, 1);
        let locations: Vec<_> = facilities.iter().map(|f| f.location).collect();
        assert_eq!(locations, [Some(YABA), None, Some(preset)]);
    }
}
