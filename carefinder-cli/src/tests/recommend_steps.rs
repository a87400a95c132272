//! Behaviour-driven step definitions driving the recommend CLI scenarios.

use super::helpers::{
    CENTRAL_LAGOS, EPE_GENERAL, SURULERE_EYE, Site, VISITOR_ADDRESS, YABA_EYE, qualified,
    write_dataset, write_utf8,
};
use super::*;
use crate::recommend::{MapsBuilder, RecommendConfig, RecommendOutput, run_recommend_with};
use camino::Utf8PathBuf;
use carefinder_core::test_support::{MemoryGeocoder, StubRouter};
use carefinder_core::{EmptyStage, Geocoder, QueryError, RankingError, Router};
use carefinder_data::GeocodeCache;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;

const ALL_SITES: [Site; 3] = [YABA_EYE, SURULERE_EYE, EPE_GENERAL];

#[derive(Debug)]
struct RecommendWorld {
    _tmp: TempDir,
    dataset: Utf8PathBuf,
    geocode_cache: Utf8PathBuf,
    geocoder: RefCell<Option<MemoryGeocoder>>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl RecommendWorld {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            _tmp: tmp,
            dataset: root.join("hospitals.json"),
            geocode_cache: root.join("cache/geocode_cache.json"),
            geocoder: RefCell::new(None),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec![
            "carefinder".to_owned(),
            "recommend".to_owned(),
            format!("--{ARG_DATASET}"),
            self.dataset.as_str().to_owned(),
            format!("--{ARG_SERVICE}"),
            "eye surgery".to_owned(),
            format!("--{ARG_GEOCODE_CACHE}"),
            self.geocode_cache.as_str().to_owned(),
        ];
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn output(&self) -> RecommendOutput {
        let stdout = String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8");
        serde_json::from_str(&stdout).expect("output should be a JSON recommendation document")
    }

    fn error_message(&self) -> String {
        let borrowed = self.result.borrow();
        let error = borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect_err("expected error");
        error.to_string()
    }
}

#[fixture]
fn world() -> RecommendWorld {
    RecommendWorld::new()
}

/// Maps collaborators backed by in-memory doubles.
#[derive(Debug)]
struct StubMapsBuilder {
    geocoder: Option<MemoryGeocoder>,
}

impl MapsBuilder for StubMapsBuilder {
    fn geocoder(&self, _config: &RecommendConfig) -> Result<Option<Box<dyn Geocoder>>, CliError> {
        Ok(self
            .geocoder
            .clone()
            .map(|geocoder| Box::new(geocoder) as Box<dyn Geocoder>))
    }

    fn router(&self, config: &RecommendConfig) -> Result<Option<Box<dyn Router>>, CliError> {
        if self.geocoder.is_none() || !config.routes {
            return Ok(None);
        }
        Ok(Some(Box::new(StubRouter::default())))
    }
}

fn known_addresses() -> Vec<(String, geo::Coord<f64>)> {
    ALL_SITES
        .iter()
        .map(|site| (site.address.to_owned(), site.location))
        .chain([(VISITOR_ADDRESS.to_owned(), CENTRAL_LAGOS)])
        .collect()
}

#[given("a dataset listing the Yaba, Surulere and Epe facilities")]
fn dataset_with_all_sites(#[from(world)] world: &RecommendWorld) {
    write_dataset(&world.dataset, &ALL_SITES);
}

#[given("a dataset listing only the Epe facility")]
fn dataset_with_epe(#[from(world)] world: &RecommendWorld) {
    write_dataset(&world.dataset, &[EPE_GENERAL]);
}

#[given("an empty dataset")]
fn empty_dataset(#[from(world)] world: &RecommendWorld) {
    write_utf8(&world.dataset, b"[]");
}

#[given("no dataset file")]
fn no_dataset(#[from(world)] world: &RecommendWorld) {
    assert!(!world.dataset.exists());
}

#[given("a maps service that knows every address")]
fn maps_service_knows_addresses(#[from(world)] world: &RecommendWorld) {
    let known: Vec<(String, geo::Coord<f64>)> = known_addresses()
        .into_iter()
        .map(|(address, location)| (qualified(&address), location))
        .collect();
    let geocoder = MemoryGeocoder::new(
        known
            .iter()
            .map(|(address, location)| (address.as_str(), *location)),
    );
    world.geocoder.replace(Some(geocoder));
}

#[given("a geocode cache that knows every address")]
fn cache_knows_addresses(#[from(world)] world: &RecommendWorld) {
    let mut cache = GeocodeCache::default();
    for (address, location) in known_addresses() {
        cache.insert(address, Some(location));
    }
    cache.save(&world.geocode_cache).expect("save geocode cache");
}

#[given("no maps service is configured")]
fn no_maps_service(#[from(world)] world: &RecommendWorld) {
    world.geocoder.replace(None);
}

#[given("I am at {address}")]
fn visitor_at(#[from(world)] world: &RecommendWorld, address: String) {
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_LOCATION}"),
        address.trim().trim_matches('"').to_owned(),
    ]);
}

#[given("I ask for cost preference {level}")]
fn cost_preference(#[from(world)] world: &RecommendWorld, level: String) {
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_COST_PREFERENCE}"),
        level.trim().trim_matches('"').to_owned(),
    ]);
}

#[when("I run the recommend command")]
fn run_recommend_command(#[from(world)] world: &RecommendWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Recommend(args) => {
            let builder = StubMapsBuilder {
                geocoder: world.geocoder.borrow().clone(),
            };
            let mut buffer = world.stdout.borrow_mut();
            run_recommend_with(args, &builder, &mut *buffer)
        }
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &RecommendWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    if let Err(err) = result {
        panic!("expected success, found {err:?}");
    }
}

#[then("{count} facilities are recommended")]
fn facilities_recommended(#[from(world)] world: &RecommendWorld, count: usize) {
    let output = world.output();
    assert_eq!(output.recommendations.len(), count);
    let scores: Vec<f64> = output
        .recommendations
        .iter()
        .map(|entry| entry.recommendation.recommendation_score)
        .collect();
    assert!(
        scores.windows(2).all(|pair| pair.first() >= pair.get(1)),
        "scores should be descending: {scores:?}"
    );
}

#[then("{name} is not recommended")]
fn not_recommended(#[from(world)] world: &RecommendWorld, name: String) {
    let expected = name.trim().trim_matches('"');
    let output = world.output();
    assert!(
        output
            .recommendations
            .iter()
            .all(|entry| entry.recommendation.name != expected),
        "{expected} should have been filtered out"
    );
}

#[then("every recommendation has a driving route")]
fn every_recommendation_routed(#[from(world)] world: &RecommendWorld) {
    let output = world.output();
    assert!(
        output
            .recommendations
            .iter()
            .all(|entry| entry.route.is_some())
    );
}

#[then("no recommendation has a driving route")]
fn no_recommendation_routed(#[from(world)] world: &RecommendWorld) {
    let output = world.output();
    assert!(
        output
            .recommendations
            .iter()
            .all(|entry| entry.route.is_none())
    );
}

#[then("the echoed inputs have no location")]
fn echoed_inputs(#[from(world)] world: &RecommendWorld) {
    let output = world.output();
    assert_eq!(output.user_inputs.location, None);
    assert_eq!(output.user_inputs.service, "eye surgery");
    assert_eq!(
        output.user_inputs.cost_preference,
        carefinder_core::Preference::Medium
    );
}

#[then("the geocode cache records every address")]
fn cache_records_addresses(#[from(world)] world: &RecommendWorld) {
    let cache = GeocodeCache::load(&world.geocode_cache);
    for (address, location) in known_addresses() {
        assert_eq!(cache.get(&address), Some(Some(location)), "{address}");
    }
}

#[then("the command fails with {message}")]
fn command_fails_with(#[from(world)] world: &RecommendWorld, message: String) {
    assert_eq!(world.error_message(), message.trim().trim_matches('"'));
    let borrowed = world.result.borrow();
    match borrowed.as_ref() {
        Some(Err(CliError::NotFound(RankingError::Empty {
            stage: EmptyStage::Radius { .. } | EmptyStage::Candidates,
        }))) => {}
        other => panic!("expected a stage-labelled empty result, found {other:?}"),
    }
}

#[then("the command fails because the dataset is missing")]
fn command_fails_missing_dataset(#[from(world)] world: &RecommendWorld) {
    let borrowed = world.result.borrow();
    match borrowed.as_ref() {
        Some(Err(CliError::MissingSourceFile { field, .. })) => assert_eq!(*field, ARG_DATASET),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[then("the command fails because the cost preference is invalid")]
fn command_fails_invalid_preference(#[from(world)] world: &RecommendWorld) {
    let borrowed = world.result.borrow();
    match borrowed.as_ref() {
        Some(Err(CliError::Query(QueryError::InvalidPreference { field, value }))) => {
            assert_eq!(*field, "cost");
            assert_eq!(value, "Cheap");
        }
        other => panic!("expected InvalidPreference, found {other:?}"),
    }
}

macro_rules! register_recommend_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/recommend_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: RecommendWorld) {
            let _ = world;
        }
    };
}

register_recommend_scenario!(recommend_nearby, "recommending nearby facilities with routes");
register_recommend_scenario!(recommend_without_location, "ranking without a location");
register_recommend_scenario!(recommend_offline, "working offline from the geocode cache");
register_recommend_scenario!(recommend_radius_empty, "no facility within the radius");
register_recommend_scenario!(recommend_empty_dataset, "an empty dataset");
register_recommend_scenario!(recommend_missing_dataset, "rejecting a missing dataset");
register_recommend_scenario!(
    recommend_invalid_preference,
    "rejecting an unknown cost preference"
);
