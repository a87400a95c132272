//! Data access for the Carefinder engine.
//!
//! Responsibilities:
//! - Load the facility dataset from disk.
//! - Resolve addresses through a persisted geocode cache and an HTTP
//!   geocoding service.
//! - Fetch driving routes from an HTTP directions service.
//!
//! Boundaries:
//! - Do not encode scoring rules (live in `carefinder-core`).
//! - Bridge async HTTP calls to the synchronous collaborator traits of
//!   `carefinder-core` without requiring callers to run a Tokio runtime.
//!
//! Invariants:
//! - No sentinel coordinates: an unresolved address is `None`.
//! - API keys never appear in error messages or logs.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod dataset;
mod geocode;
mod maps;
mod routing;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use dataset::{DatasetError, load_facilities, parse_facilities};
pub use geocode::{
    CachedGeocoder, DEFAULT_ADDRESS_SUFFIX, GeocodeCache, GeocodeCacheError, HttpGeocoder,
};
pub use maps::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, MapsConfig, ProviderBuildError};
pub use routing::{HttpRouter, strip_html};
