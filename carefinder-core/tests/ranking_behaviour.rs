//! Behavioural tests for the ranking pipeline.

use std::cell::RefCell;

use carefinder_core::test_support::TableScorer;
use carefinder_core::{
    EmptyStage, Facility, FacilityScorer, FuzzyScorer, Query, RankingConfig, RankingError,
    Recommendation, rank,
};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const CENTRAL_LAGOS: Coord<f64> = Coord { x: 3.3792, y: 6.5244 };
const YABA: Coord<f64> = Coord { x: 3.3792, y: 6.5425 };
const EPE: Coord<f64> = Coord { x: 3.98, y: 6.58 };
const OUT_OF_RANGE: Coord<f64> = Coord { x: 3.38, y: 123.0 };

#[derive(Debug, Default)]
struct RankingWorld {
    facilities: RefCell<Vec<Facility>>,
    scorer: RefCell<TableScorer>,
    location: RefCell<Option<Coord<f64>>>,
    result: RefCell<Option<Result<Vec<Recommendation>, RankingError>>>,
}

#[fixture]
fn world() -> RankingWorld {
    RankingWorld::default()
}

/// Split `"A, B and C"` into its items.
fn items(list: &str) -> Vec<String> {
    list.split([','])
        .flat_map(|part| part.split(" and "))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn dental_clinic(name: &str, location: Coord<f64>) -> Facility {
    Facility::new(name, "Lagos")
        .with_services("Dental")
        .with_cost_level("Medium")
        .with_quality_score(4.0)
        .with_user_rating(3.5)
        .with_location(location)
}

fn run(world: &RankingWorld, scorer: &dyn FacilityScorer) {
    let mut query = Query::parse("dental", "Medium", "Medium").expect("valid query");
    if let Some(location) = *world.location.borrow() {
        query = query.with_location(location).expect("valid location");
    }
    let result = rank(
        &world.facilities.borrow(),
        &query,
        scorer,
        &RankingConfig::default(),
    );
    world.result.replace(Some(result));
}

#[given("facilities {names} scored {scores}")]
fn given_scored(world: &RankingWorld, names: String, scores: String) {
    let labels = items(&names);
    let values: Vec<f64> = items(&scores)
        .iter()
        .map(|score| score.parse().expect("numeric score"))
        .collect();
    assert_eq!(labels.len(), values.len(), "one score per facility");
    world
        .facilities
        .replace(labels.iter().map(|name| Facility::new(name, "Lagos")).collect());
    world.scorer.replace(TableScorer::new(
        labels.iter().map(String::as_str).zip(values.iter().copied()),
    ));
}

#[given("a visitor in central Lagos")]
fn given_visitor(world: &RankingWorld) {
    world.location.replace(Some(CENTRAL_LAGOS));
}

#[given("a facility \"Yaba Clinic\" 2 km away and a facility \"Epe General\" over 60 km away")]
fn given_near_and_far(world: &RankingWorld) {
    world.facilities.replace(vec![
        dental_clinic("Yaba Clinic", YABA),
        dental_clinic("Epe General", EPE),
    ]);
}

#[given("only a facility \"Epe General\" over 60 km away")]
fn given_far_only(world: &RankingWorld) {
    world
        .facilities
        .replace(vec![dental_clinic("Epe General", EPE)]);
}

#[given("a facility \"Yaba Clinic\" nearby and a facility \"Broken Pin\" with latitude 123")]
fn given_valid_and_out_of_range(world: &RankingWorld) {
    world.facilities.replace(vec![
        dental_clinic("Broken Pin", OUT_OF_RANGE),
        dental_clinic("Yaba Clinic", YABA),
    ]);
}

#[when("the facilities are ranked")]
fn when_ranked(world: &RankingWorld) {
    let scorer = world.scorer.borrow().clone();
    run(world, &scorer);
}

#[when("the facilities are ranked with the fuzzy scorer")]
fn when_ranked_fuzzy(world: &RankingWorld) {
    run(world, &FuzzyScorer::default());
}

#[then("the recommendations are {names}")]
fn then_recommendations(world: &RankingWorld, names: String) {
    let result = world.result.borrow();
    let ranked = result
        .as_ref()
        .expect("ranking should run")
        .as_ref()
        .expect("ranking should succeed");
    let actual: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(actual, items(&names));
}

#[then("the ranking fails at the radius stage")]
fn then_radius_stage(world: &RankingWorld) {
    let result = world.result.borrow();
    let err = result
        .as_ref()
        .expect("ranking should run")
        .as_ref()
        .expect_err("ranking should fail");
    assert!(matches!(err.stage(), EmptyStage::Radius { .. }), "{err}");
}

#[then("the ranking fails at the score stage")]
fn then_score_stage(world: &RankingWorld) {
    let result = world.result.borrow();
    let err = result
        .as_ref()
        .expect("ranking should run")
        .as_ref()
        .expect_err("ranking should fail");
    assert!(matches!(err.stage(), EmptyStage::Score { .. }), "{err}");
}

#[scenario(path = "tests/features/ranking.feature", index = 0)]
fn ties_keep_input_order(world: RankingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ranking.feature", index = 1)]
fn radius_excludes_distant_facilities(world: RankingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ranking.feature", index = 2)]
fn empty_radius_is_labelled(world: RankingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ranking.feature", index = 3)]
fn zero_scores_are_labelled(world: RankingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ranking.feature", index = 4)]
fn out_of_range_coordinates_without_visitor(world: RankingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ranking.feature", index = 5)]
fn out_of_range_coordinates_near_visitor(world: RankingWorld) {
    let _ = world;
}
