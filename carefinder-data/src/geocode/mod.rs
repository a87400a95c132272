//! Address resolution: the persisted cache, the caching wrapper and the HTTP
//! geocoder.

mod cache;
mod cached;
mod http;

pub use cache::{GeocodeCache, GeocodeCacheError};
pub use cached::{CachedGeocoder, DEFAULT_ADDRESS_SUFFIX};
pub use http::HttpGeocoder;
