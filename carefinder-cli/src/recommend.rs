//! Recommend command implementation for the Carefinder CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use carefinder_core::{
    FuzzyScorer, Geocoder, Preference, Query, RankingConfig, Recommendation, RouteSummary, Router,
    rank, resolve_locations, routes_for,
};
use carefinder_data::{
    CachedGeocoder, DEFAULT_ADDRESS_SUFFIX, DEFAULT_BASE_URL, GeocodeCache, HttpGeocoder,
    HttpRouter, MapsConfig, load_facilities,
};
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ADDRESS_SUFFIX, ARG_COST_PREFERENCE, ARG_DATASET, ARG_GEOCODE_CACHE, ARG_LOCATION,
    ARG_MAPS_API_KEY, ARG_MAPS_BASE_URL, ARG_NO_ROUTES, ARG_QUALITY_PREFERENCE, ARG_RADIUS_KM,
    ARG_SERVICE, ARG_TOP_K, CliError, ENV_DATASET, ENV_SERVICE,
};

const DEFAULT_GEOCODE_CACHE: &str = "geocode_cache.json";

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score every facility in the dataset against the requested \
                 service and preferences, keep those near the visitor's \
                 location, and print the best matches as JSON. Addresses \
                 are resolved through a persisted geocode cache and, when an \
                 API key is configured, a maps service that also supplies \
                 driving routes.",
    about = "Recommend facilities for a service"
)]
#[ortho_config(prefix = "CAREFINDER")]
pub(crate) struct RecommendArgs {
    /// Path to the facility dataset (JSON array of records).
    #[arg(long = ARG_DATASET, value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
    /// Service the visitor needs, e.g. "eye surgery".
    #[arg(long = ARG_SERVICE, value_name = "text")]
    #[serde(default)]
    pub(crate) service: Option<String>,
    /// Cost preference: Low, Medium or High (default Medium).
    #[arg(long = ARG_COST_PREFERENCE, value_name = "level")]
    #[serde(default)]
    pub(crate) cost_preference: Option<String>,
    /// Quality preference: Low, Medium or High (default High).
    #[arg(long = ARG_QUALITY_PREFERENCE, value_name = "level")]
    #[serde(default)]
    pub(crate) quality_preference: Option<String>,
    /// Visitor's address; omit to rank without a distance filter.
    #[arg(long = ARG_LOCATION, value_name = "address")]
    #[serde(default)]
    pub(crate) location: Option<String>,
    /// Path to the persisted geocode cache.
    #[arg(long = ARG_GEOCODE_CACHE, value_name = "path")]
    #[serde(default)]
    pub(crate) geocode_cache: Option<Utf8PathBuf>,
    /// Base URL of the maps service (e.g. "https://maps.googleapis.com").
    #[arg(long = ARG_MAPS_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) maps_base_url: Option<String>,
    /// API key for the maps service; without one only the cache is used.
    #[arg(long = ARG_MAPS_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) maps_api_key: Option<String>,
    /// Text appended to addresses before geocoding; empty disables it.
    #[arg(long = ARG_ADDRESS_SUFFIX, value_name = "text")]
    #[serde(default)]
    pub(crate) address_suffix: Option<String>,
    /// Skip fetching driving routes for the recommendations.
    #[arg(long = ARG_NO_ROUTES)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) no_routes: bool,
    /// Radius around the visitor's location, in kilometres (default 10).
    #[arg(long = ARG_RADIUS_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) radius_km: Option<f64>,
    /// Number of recommendations to print (default 3).
    #[arg(long = ARG_TOP_K, value_name = "count")]
    #[serde(default)]
    pub(crate) top_k: Option<usize>,
}

impl RecommendArgs {
    pub(crate) fn into_config(self) -> Result<RecommendConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendConfig::try_from(merged)
    }
}

/// Resolved `recommend` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecommendConfig {
    /// Path to the facility dataset.
    pub(crate) dataset: Utf8PathBuf,
    /// Validated service and preferences; the location is resolved later.
    pub(crate) query: Query,
    /// Visitor's address as entered.
    pub(crate) location: Option<String>,
    /// Path to the persisted geocode cache.
    pub(crate) geocode_cache: Utf8PathBuf,
    /// Maps service settings; the key is redacted from `Debug` output.
    pub(crate) maps: MapsConfig,
    /// Text appended to addresses before geocoding.
    pub(crate) address_suffix: String,
    /// Whether driving routes are fetched.
    pub(crate) routes: bool,
    /// Radius and truncation settings for ranking.
    pub(crate) ranking: RankingConfig,
}

impl RecommendConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.dataset, ARG_DATASET)
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match carefinder_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<RecommendArgs> for RecommendConfig {
    type Error = CliError;

    fn try_from(args: RecommendArgs) -> Result<Self, Self::Error> {
        let dataset = args.dataset.ok_or(CliError::MissingArgument {
            field: ARG_DATASET,
            env: ENV_DATASET,
        })?;
        let service = args.service.ok_or(CliError::MissingArgument {
            field: ARG_SERVICE,
            env: ENV_SERVICE,
        })?;
        let cost = args
            .cost_preference
            .unwrap_or_else(|| Preference::Medium.as_str().to_owned());
        let quality = args
            .quality_preference
            .unwrap_or_else(|| Preference::High.as_str().to_owned());
        let query = Query::parse(&service, &cost, &quality)?;

        let defaults = RankingConfig::default();
        let radius_km = match args.radius_km {
            Some(radius) if !(radius.is_finite() && radius > 0.0) => {
                return Err(CliError::InvalidArgument {
                    field: ARG_RADIUS_KM,
                    reason: format!("{radius} is not a positive distance"),
                });
            }
            Some(radius) => radius,
            None => defaults.radius_km,
        };
        let top_k = match args.top_k {
            Some(0) => {
                return Err(CliError::InvalidArgument {
                    field: ARG_TOP_K,
                    reason: "at least one recommendation must be requested".to_owned(),
                });
            }
            Some(count) => count,
            None => defaults.top_k,
        };

        let location = args
            .location
            .map(|address| address.trim().to_owned())
            .filter(|address| !address.is_empty());
        let mut maps =
            MapsConfig::new(args.maps_base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()));
        maps.api_key = args
            .maps_api_key
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty());

        Ok(Self {
            dataset,
            query,
            location,
            geocode_cache: args
                .geocode_cache
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_GEOCODE_CACHE)),
            maps,
            address_suffix: args
                .address_suffix
                .unwrap_or_else(|| DEFAULT_ADDRESS_SUFFIX.to_owned()),
            routes: !args.no_routes,
            ranking: RankingConfig {
                radius_km,
                top_k,
                ..defaults
            },
        })
    }
}

/// Builds the maps collaborators for the current recommend invocation.
///
/// `None` means the collaborator is unavailable and the command proceeds
/// without it.
pub(super) trait MapsBuilder {
    fn geocoder(&self, config: &RecommendConfig) -> Result<Option<Box<dyn Geocoder>>, CliError>;
    fn router(&self, config: &RecommendConfig) -> Result<Option<Box<dyn Router>>, CliError>;
}

pub(super) struct DefaultMapsBuilder;

impl MapsBuilder for DefaultMapsBuilder {
    fn geocoder(&self, config: &RecommendConfig) -> Result<Option<Box<dyn Geocoder>>, CliError> {
        if config.maps.api_key.is_none() {
            return Ok(None);
        }
        let geocoder = HttpGeocoder::with_config(config.maps.clone()).map_err(|source| {
            CliError::BuildProvider {
                base_url: config.maps.base_url.clone(),
                source,
            }
        })?;
        Ok(Some(Box::new(geocoder)))
    }

    fn router(&self, config: &RecommendConfig) -> Result<Option<Box<dyn Router>>, CliError> {
        if !config.routes || config.maps.api_key.is_none() {
            return Ok(None);
        }
        let router = HttpRouter::with_config(config.maps.clone()).map_err(|source| {
            CliError::BuildProvider {
                base_url: config.maps.base_url.clone(),
                source,
            }
        })?;
        Ok(Some(Box::new(router)))
    }
}

/// The JSON document printed by `recommend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RecommendOutput {
    pub(crate) user_inputs: UserInputs,
    pub(crate) recommendations: Vec<RoutedRecommendation>,
}

/// Echo of the request as the visitor entered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct UserInputs {
    pub(crate) location: Option<String>,
    pub(crate) service: String,
    pub(crate) cost_preference: Preference,
    pub(crate) quality_preference: Preference,
}

/// A ranked facility with its driving route, when one was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RoutedRecommendation {
    #[serde(flatten)]
    pub(crate) recommendation: Recommendation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) route: Option<RouteSummary>,
}

pub(super) fn run_recommend(args: RecommendArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_recommend_with(args, &DefaultMapsBuilder, &mut stdout)
}

pub(super) fn run_recommend_with(
    args: RecommendArgs,
    builder: &dyn MapsBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let output = execute_recommend(args, builder)?;
    write_output(writer, &output)
}

fn execute_recommend(
    args: RecommendArgs,
    builder: &dyn MapsBuilder,
) -> Result<RecommendOutput, CliError> {
    let config = resolve_recommend_config(args)?;
    let mut facilities = load_facilities(&config.dataset)?;
    log::info!("loaded {} facilities from {}", facilities.len(), config.dataset);

    let cache = GeocodeCache::load(&config.geocode_cache);
    let visitor = match builder.geocoder(&config)? {
        Some(service) => {
            let geocoder = CachedGeocoder::new(&*service, cache)
                .with_address_suffix(&config.address_suffix);
            let visitor = locate_visitor(&geocoder, config.location.as_deref());
            resolve_locations(&mut facilities, &geocoder);
            if let Err(err) = geocoder.save_if_dirty(&config.geocode_cache) {
                log::warn!("geocode cache not saved: {err}");
            }
            visitor
        }
        None => {
            log::info!(
                "no maps API key configured; resolving addresses from {} only",
                config.geocode_cache
            );
            let visitor = locate_visitor(&cache, config.location.as_deref());
            resolve_locations(&mut facilities, &cache);
            visitor
        }
    };

    let query = with_visitor(config.query.clone(), visitor);
    let ranked = rank(
        &facilities,
        &query,
        &FuzzyScorer::default(),
        &config.ranking,
    )?;

    let routes = match builder.router(&config)? {
        Some(router) => routes_for(&*router, query.location(), &ranked),
        None => vec![None; ranked.len()],
    };
    let recommendations = ranked
        .into_iter()
        .zip(routes)
        .map(|(recommendation, route)| RoutedRecommendation {
            recommendation,
            route,
        })
        .collect();

    Ok(RecommendOutput {
        user_inputs: UserInputs {
            location: config.location,
            service: query.service().to_owned(),
            cost_preference: query.cost_preference(),
            quality_preference: query.quality_preference(),
        },
        recommendations,
    })
}

fn resolve_recommend_config(args: RecommendArgs) -> Result<RecommendConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn locate_visitor<G>(geocoder: &G, address: Option<&str>) -> Option<Coord<f64>>
where
    G: Geocoder + ?Sized,
{
    let Some(address) = address else {
        log::info!("no location provided; ranking without a distance filter");
        return None;
    };
    let location = geocoder.resolve(address);
    match location {
        Some(coord) => log::info!("located '{address}' at ({}, {})", coord.y, coord.x),
        None => log::info!("could not locate '{address}'; ranking without a distance filter"),
    }
    location
}

fn with_visitor(query: Query, location: Option<Coord<f64>>) -> Query {
    let Some(coord) = location else {
        return query;
    };
    match query.clone().with_location(coord) {
        Ok(located) => located,
        Err(err) => {
            log::warn!("ignoring visitor location: {err}");
            query
        }
    }
}

fn write_output(writer: &mut dyn Write, output: &RecommendOutput) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(output).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RecommendConfig, CliError> {
    let merged = RecommendArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RecommendConfig::try_from(merged)
}
