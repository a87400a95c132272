//! Behavioural tests for [`CachedGeocoder`] backed by a cache file.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use carefinder_core::Geocoder;
use carefinder_data::test_support::CountingGeocoder;
use carefinder_data::{CachedGeocoder, GeocodeCache};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

const IKEJA: Coord<f64> = Coord {
    x: 3.3515,
    y: 6.6018,
};

/// A cache path inside a scratch directory that lives as long as the scenario.
#[derive(Debug)]
struct CacheFile {
    _dir: TempDir,
    path: Utf8PathBuf,
}

#[fixture]
fn cache_file() -> CacheFile {
    let dir = TempDir::new().expect("temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("cache/geocode_cache.json"))
        .expect("utf-8 temp path");
    CacheFile { _dir: dir, path }
}

#[fixture]
fn service() -> RefCell<CountingGeocoder> {
    RefCell::new(CountingGeocoder::default())
}

fn unquote(text: &str) -> &str {
    text.trim().trim_matches('"')
}

// --- Given steps ---

#[given("a geocoding service that knows {address}")]
fn service_knows(#[from(service)] service: &RefCell<CountingGeocoder>, address: String) {
    *service.borrow_mut() = CountingGeocoder::new([(unquote(&address), IKEJA)]);
}

#[given("a geocoding service that fails for {address}")]
fn service_fails(#[from(service)] service: &RefCell<CountingGeocoder>, address: String) {
    *service.borrow_mut() = CountingGeocoder::default().failing_on(unquote(&address));
}

#[given("no geocode cache file yet")]
fn no_cache_file(#[from(cache_file)] cache_file: &CacheFile) {
    assert!(!cache_file.path.exists(), "cache file should not exist yet");
}

#[given("a corrupt geocode cache file")]
fn corrupt_cache_file(#[from(cache_file)] cache_file: &CacheFile) {
    std::fs::create_dir_all(cache_file.path.parent().expect("cache dir")).expect("create dir");
    std::fs::write(&cache_file.path, "Address,Coordinates\nIkeja,\"(6.6, 3.35)\"\n")
        .expect("write corrupt cache");
}

// --- When steps ---

#[when("{address} is geocoded twice")]
fn geocode_twice(
    #[from(service)] service: &RefCell<CountingGeocoder>,
    #[from(cache_file)] cache_file: &CacheFile,
    address: String,
) {
    let inner = service.borrow();
    let geocoder = CachedGeocoder::new(&*inner, GeocodeCache::load(&cache_file.path));
    let first = geocoder.resolve(unquote(&address));
    let second = geocoder.resolve(unquote(&address));
    assert_eq!(first, second, "cached answer should match the live one");
    geocoder
        .save_if_dirty(&cache_file.path)
        .expect("cache should save");
}

// --- Then steps ---

#[then("the geocoding service was consulted {count} time")]
fn consulted_once(#[from(service)] service: &RefCell<CountingGeocoder>, count: usize) {
    assert_eq!(service.borrow().calls(), count);
}

#[then("the geocoding service was consulted {count} times")]
fn consulted_many(#[from(service)] service: &RefCell<CountingGeocoder>, count: usize) {
    assert_eq!(service.borrow().calls(), count);
}

#[then("the saved cache resolves {address}")]
fn saved_cache_resolves(#[from(cache_file)] cache_file: &CacheFile, address: String) {
    let cache = GeocodeCache::load(&cache_file.path);
    assert_eq!(cache.get(unquote(&address)), Some(Some(IKEJA)));
}

#[then("the saved cache records {address} as unresolved")]
fn saved_cache_unresolved(#[from(cache_file)] cache_file: &CacheFile, address: String) {
    let cache = GeocodeCache::load(&cache_file.path);
    assert_eq!(cache.get(unquote(&address)), Some(None));
}

#[then("no cache file is written")]
fn no_cache_written(#[from(cache_file)] cache_file: &CacheFile) {
    assert!(!cache_file.path.exists(), "cache file should not be written");
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/geocode_cache.feature", name = $title)]
        fn $fn_name(service: RefCell<CountingGeocoder>, cache_file: CacheFile) {
            let _ = (service, cache_file);
        }
    };
}

register_scenario!(
    resolved_addresses_are_cached,
    "Resolved addresses are served from the cache"
);
register_scenario!(
    unmatched_addresses_are_remembered,
    "Unmatched addresses are remembered"
);
register_scenario!(corrupt_cache_starts_empty, "A corrupt cache file starts empty");
register_scenario!(failed_lookups_are_retried, "Failed lookups are retried");
