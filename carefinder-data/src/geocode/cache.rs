//! Persisted address → coordinate cache.

use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use carefinder_core::{GeocodeError, Geocoder, validate_location};
use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while persisting a [`GeocodeCache`].
#[derive(Debug, Error)]
pub enum GeocodeCacheError {
    /// The cache could not be serialised.
    #[error("failed to serialise geocode cache")]
    Serialise(#[source] serde_json::Error),
    /// The cache file could not be written.
    #[error("failed to write geocode cache to {path}")]
    Write {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct CachedLocation {
    lat: f64,
    lon: f64,
}

impl From<Coord<f64>> for CachedLocation {
    fn from(location: Coord<f64>) -> Self {
        Self {
            lat: location.y,
            lon: location.x,
        }
    }
}

impl From<CachedLocation> for Coord<f64> {
    fn from(cached: CachedLocation) -> Self {
        Self {
            x: cached.lon,
            y: cached.lat,
        }
    }
}

/// Geocoding results keyed by the address as it appears in the dataset.
///
/// An entry of `None` records an address the service could not resolve; it
/// is answered from the cache rather than queried again. The on-disk form is
/// a JSON object:
///
/// ```json
/// { "12 Awolowo Road": { "lat": 6.4474, "lon": 3.4219 }, "Nowhere": null }
/// ```
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use carefinder_data::GeocodeCache;
///
/// let mut cache = GeocodeCache::default();
/// cache.insert("Ikeja", Some(Coord { x: 3.3515, y: 6.6018 }));
/// cache.insert("Nowhere", None);
/// assert_eq!(cache.get("Ikeja"), Some(Some(Coord { x: 3.3515, y: 6.6018 })));
/// assert_eq!(cache.get("Nowhere"), Some(None));
/// assert_eq!(cache.get("Yaba"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeCache {
    entries: BTreeMap<String, Option<CachedLocation>>,
    dirty: bool,
}

impl GeocodeCache {
    /// Load the cache stored at `path`.
    ///
    /// A missing file yields an empty cache. An unreadable or corrupt file is
    /// logged and also yields an empty cache, so a damaged cache never stops
    /// a recommendation.
    #[must_use]
    pub fn load(path: &Utf8Path) -> Self {
        match carefinder_fs::read_utf8_if_exists(path) {
            Ok(Some(text)) => Self::from_json(&text).unwrap_or_else(|err| {
                log::warn!("ignoring corrupt geocode cache at {path}: {err}");
                Self::default()
            }),
            Ok(None) => {
                log::debug!("no geocode cache at {path}; starting empty");
                Self::default()
            }
            Err(err) => {
                log::warn!("cannot read geocode cache at {path}: {err}; starting empty");
                Self::default()
            }
        }
    }

    /// Parse a cache from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when `json` is not an object of optional
    /// `{lat, lon}` entries.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries = serde_json::from_str(json)?;
        Ok(Self {
            entries,
            dirty: false,
        })
    }

    /// Render the cache as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeCacheError::Serialise`] when a cached coordinate is
    /// not representable in JSON.
    pub fn to_json(&self) -> Result<String, GeocodeCacheError> {
        serde_json::to_string_pretty(&self.entries).map_err(GeocodeCacheError::Serialise)
    }

    /// Write the cache to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeCacheError`] when serialisation or the write fails.
    pub fn save(&self, path: &Utf8Path) -> Result<(), GeocodeCacheError> {
        let json = self.to_json()?;
        carefinder_fs::write_utf8_atomic(path, &json).map_err(|source| {
            GeocodeCacheError::Write {
                path: path.to_path_buf(),
                source,
            }
        })?;
        log::debug!("saved {} geocode cache entries to {path}", self.entries.len());
        Ok(())
    }

    /// Look up `address`.
    ///
    /// Returns `None` on a miss and `Some(None)` for a recorded failure.
    /// Entries holding out-of-range coordinates are reported as misses so
    /// the address is geocoded again.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<Option<Coord<f64>>> {
        match self.entries.get(address)? {
            None => Some(None),
            Some(cached) => {
                let location = Coord::from(*cached);
                if let Err(err) = validate_location(location) {
                    log::warn!("invalid cached coordinates for '{address}' ({err}); re-geocoding");
                    return None;
                }
                Some(Some(location))
            }
        }
    }

    /// Record the outcome of geocoding `address`.
    pub fn insert(&mut self, address: impl Into<String>, location: Option<Coord<f64>>) {
        self.entries
            .insert(address.into(), location.map(CachedLocation::from));
        self.dirty = true;
    }

    /// Whether entries were added since the cache was loaded.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of cached addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no addresses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Answers lookups from the cache alone; a miss is "no match".
///
/// Useful when no geocoding service is configured.
impl Geocoder for GeocodeCache {
    fn geocode(&self, address: &str) -> Result<Option<Coord<f64>>, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        Ok(self.get(address).flatten())
    }
}
