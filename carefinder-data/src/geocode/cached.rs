//! Cache-backed geocoding.

use std::sync::{Mutex, MutexGuard, PoisonError};

use camino::Utf8Path;
use carefinder_core::{GeocodeError, Geocoder};
use geo::Coord;

use super::cache::{GeocodeCache, GeocodeCacheError};

/// Region appended to dataset addresses before they are sent to the service.
pub const DEFAULT_ADDRESS_SUFFIX: &str = "Lagos, Nigeria";

/// A [`Geocoder`] that answers from a [`GeocodeCache`] before asking `G`.
///
/// Cache keys are the addresses as given; the inner geocoder receives the
/// address qualified with the configured suffix. Successful lookups,
/// including "no match", are cached. Transport and service errors are not,
/// so the address is retried on the next run.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use carefinder_core::Geocoder;
/// use carefinder_data::{CachedGeocoder, GeocodeCache};
/// use carefinder_data::test_support::CountingGeocoder;
///
/// let ikeja = Coord { x: 3.3515, y: 6.6018 };
/// let inner = CountingGeocoder::new([("Ikeja, Lagos, Nigeria", ikeja)]);
/// let geocoder = CachedGeocoder::new(&inner, GeocodeCache::default());
///
/// assert_eq!(geocoder.geocode("Ikeja")?, Some(ikeja));
/// assert_eq!(geocoder.geocode("Ikeja")?, Some(ikeja));
/// assert_eq!(inner.calls(), 1);
/// # Ok::<(), carefinder_core::GeocodeError>(())
/// ```
#[derive(Debug)]
pub struct CachedGeocoder<G> {
    inner: G,
    cache: Mutex<GeocodeCache>,
    suffix: Option<String>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    /// Wrap `inner` with `cache`, using [`DEFAULT_ADDRESS_SUFFIX`].
    #[must_use]
    pub fn new(inner: G, cache: GeocodeCache) -> Self {
        Self {
            inner,
            cache: Mutex::new(cache),
            suffix: Some(DEFAULT_ADDRESS_SUFFIX.to_owned()),
        }
    }

    /// Replace the address suffix; a blank suffix disables qualification.
    #[must_use]
    pub fn with_address_suffix(mut self, suffix: &str) -> Self {
        let trimmed = suffix.trim();
        self.suffix = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// The address as sent to the inner geocoder.
    #[must_use]
    pub fn qualified(&self, address: &str) -> String {
        let base = address.trim();
        match &self.suffix {
            Some(suffix) => format!("{base}, {suffix}"),
            None => base.to_owned(),
        }
    }

    /// The wrapped geocoder.
    #[must_use]
    pub const fn inner(&self) -> &G {
        &self.inner
    }

    /// Persist the cache to `path` if it gained entries.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeCacheError`] when the write fails.
    pub fn save_if_dirty(&self, path: &Utf8Path) -> Result<bool, GeocodeCacheError> {
        let cache = self.lock();
        if !cache.is_dirty() {
            return Ok(false);
        }
        cache.save(path)?;
        Ok(true)
    }

    /// Unwrap the cache.
    #[must_use]
    pub fn into_cache(self) -> GeocodeCache {
        self.cache
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, GeocodeCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    fn geocode(&self, address: &str) -> Result<Option<Coord<f64>>, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        if let Some(hit) = self.lock().get(address) {
            log::debug!("geocode cache hit for '{address}'");
            return Ok(hit);
        }
        log::debug!("geocode cache miss for '{address}'");
        let location = self.inner.geocode(&self.qualified(address))?;
        if location.is_none() {
            log::info!("no geocoding match for '{address}'");
        }
        self.lock().insert(address, location);
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CountingGeocoder;
    use rstest::{fixture, rstest};

    const YABA: Coord<f64> = Coord { x: 3.38, y: 6.51 };

    #[fixture]
    fn inner() -> CountingGeocoder {
        CountingGeocoder::new([("Yaba, Lagos, Nigeria", YABA)]).failing_on("Broken, Lagos, Nigeria")
    }

    #[rstest]
    fn caches_hits_and_misses(inner: CountingGeocoder) {
        let geocoder = CachedGeocoder::new(&inner, GeocodeCache::default());
        for _ in 0..2 {
            assert_eq!(geocoder.geocode("Yaba"), Ok(Some(YABA)));
            assert_eq!(geocoder.geocode("Atlantis"), Ok(None));
        }
        assert_eq!(inner.calls(), 2);
        let cache = geocoder.into_cache();
        assert_eq!(cache.get("Atlantis"), Some(None));
    }

    #[rstest]
    fn errors_are_not_cached(inner: CountingGeocoder) {
        let geocoder = CachedGeocoder::new(&inner, GeocodeCache::default());
        assert!(geocoder.geocode("Broken").is_err());
        assert!(geocoder.geocode("Broken").is_err());
        assert_eq!(inner.calls(), 2);
        assert!(geocoder.into_cache().is_empty());
    }

    #[rstest]
    fn preloaded_entries_skip_the_service(inner: CountingGeocoder) {
        let mut cache = GeocodeCache::default();
        cache.insert("Ikeja", Some(Coord { x: 3.35, y: 6.60 }));
        let geocoder = CachedGeocoder::new(&inner, cache);
        assert!(geocoder.geocode("Ikeja").expect("cached").is_some());
        assert_eq!(inner.calls(), 0);
    }

    #[rstest]
    #[case::default_suffix(None, "12 Awolowo Road, Lagos, Nigeria")]
    #[case::custom_suffix(Some("Abuja, Nigeria"), "12 Awolowo Road, Abuja, Nigeria")]
    #[case::no_suffix(Some("  "), "12 Awolowo Road")]
    fn qualifies_addresses(
        inner: CountingGeocoder,
        #[case] suffix: Option<&str>,
        #[case] expected: &str,
    ) {
        let base = CachedGeocoder::new(inner, GeocodeCache::default());
        let geocoder = match suffix {
            Some(text) => base.with_address_suffix(text),
            None => base,
        };
        assert_eq!(geocoder.qualified(" 12 Awolowo Road "), expected);
    }

    #[rstest]
    fn owned_inner_geocoder_stays_reachable(inner: CountingGeocoder) {
        let geocoder = CachedGeocoder::new(inner, GeocodeCache::default());
        assert_eq!(geocoder.geocode("Yaba"), Ok(Some(YABA)));
        assert_eq!(geocoder.geocode("Yaba"), Ok(Some(YABA)));
        assert_eq!(geocoder.inner().calls(), 1);
        assert_eq!(geocoder.into_cache().get("Yaba"), Some(Some(YABA)));
    }

    #[rstest]
    fn blank_address_is_rejected(inner: CountingGeocoder) {
        let geocoder = CachedGeocoder::new(&inner, GeocodeCache::default());
        assert_eq!(geocoder.geocode("  "), Err(GeocodeError::EmptyAddress));
        assert_eq!(inner.calls(), 0);
    }
}
