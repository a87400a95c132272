//! Score, filter, sort and truncate candidate facilities.
//!
//! [`rank`] is the request-time pipeline:
//!
//! 1. compute each candidate's distance from the visitor,
//! 2. drop candidates beyond [`RankingConfig::radius_km`] when the visitor's
//!    location is known,
//! 3. score the survivors in parallel,
//! 4. keep positive scores and sort them descending, keeping input order on
//!    ties,
//! 5. truncate to [`RankingConfig::top_k`].
//!
//! Every stage that empties the candidate set ends the request with a
//! stage-labelled [`RankingError::Empty`].

use std::cmp::Ordering;
use std::fmt;

use geo::Coord;
use rayon::prelude::*;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::distance::distance_km;
use crate::facility::{AttributeValue, Facility};
use crate::normalise::DEFAULT_PROXIMITY_SCALE_KM;
use crate::query::Query;
use crate::scorer::{Candidate, FacilityScorer};

/// Tuning for [`rank`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RankingConfig {
    /// Hard radius around the visitor, in kilometres.
    pub radius_km: f64,
    /// Maximum number of recommendations returned.
    pub top_k: usize,
    /// Proximity decay scale, in kilometres.
    pub proximity_scale_km: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            radius_km: 10.0,
            top_k: 3,
            proximity_scale_km: DEFAULT_PROXIMITY_SCALE_KM,
        }
    }
}

/// The pipeline stage that left no candidates.
#[derive(Debug, Clone, PartialEq)]
pub enum EmptyStage {
    /// No candidates were supplied.
    Candidates,
    /// Every candidate lay outside the search radius.
    Radius {
        /// Radius applied, in kilometres.
        radius_km: f64,
    },
    /// No candidate scored above zero.
    Score {
        /// Requested service.
        service: String,
    },
}

impl fmt::Display for EmptyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Candidates => f.write_str("No hospitals available after filtering."),
            Self::Radius { radius_km } => write!(
                f,
                "No hospitals found within {radius_km} km of the provided location."
            ),
            Self::Score { service } => {
                write!(f, "No hospitals found matching service '{service}'.")
            }
        }
    }
}

/// Errors returned by [`rank`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankingError {
    /// A pipeline stage removed every candidate.
    #[error("{stage}")]
    Empty {
        /// Stage that emptied the set.
        stage: EmptyStage,
    },
}

impl RankingError {
    /// The stage that emptied the candidate set.
    #[must_use]
    pub const fn stage(&self) -> &EmptyStage {
        match self {
            Self::Empty { stage } => stage,
        }
    }
}

impl From<EmptyStage> for RankingError {
    fn from(stage: EmptyStage) -> Self {
        Self::Empty { stage }
    }
}

/// A ranked facility with its recommendation score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Recommendation {
    /// Display name.
    pub name: String,
    /// Postal address.
    pub address: String,
    /// Offered services.
    pub services: Option<String>,
    /// Cost category label.
    pub cost_level: Option<String>,
    /// Quality score as supplied.
    pub quality_score: Option<AttributeValue>,
    /// User rating as supplied.
    pub user_rating: Option<AttributeValue>,
    /// Defuzzified score in `0.0..=1.0`.
    pub recommendation_score: f64,
    /// Distance from the visitor in kilometres, when both ends are resolved.
    pub distance_km: Option<f64>,
    /// Resolved facility location.
    pub location: Option<Coord<f64>>,
}

impl Recommendation {
    fn new(facility: &Facility, score: f64, distance_km: Option<f64>) -> Self {
        Self {
            name: facility.name.clone(),
            address: facility.address.clone(),
            services: facility.services.clone(),
            cost_level: facility.cost_level.clone(),
            quality_score: facility.quality_score.clone(),
            user_rating: facility.user_rating.clone(),
            recommendation_score: score,
            distance_km,
            location: facility.location,
        }
    }
}

/// Rank `facilities` for `query`.
///
/// # Errors
/// Returns [`RankingError::Empty`] labelled with the stage that left no
/// candidates.
///
/// # Examples
/// ```
/// use carefinder_core::{Facility, FuzzyScorer, Query, RankingConfig, rank};
///
/// let facilities = vec![
///     Facility::new("Lagoon Eye Centre", "12 Awolowo Rd")
///         .with_services("Eye Surgery")
///         .with_cost_level("Low")
///         .with_quality_score(4.8)
///         .with_user_rating(4.5),
/// ];
/// let query = Query::parse("eye surgery", "Low", "High").expect("valid query");
/// let ranked = rank(&facilities, &query, &FuzzyScorer::default(), &RankingConfig::default());
/// assert!(ranked.is_ok());
/// ```
pub fn rank<S>(
    facilities: &[Facility],
    query: &Query,
    scorer: &S,
    config: &RankingConfig,
) -> Result<Vec<Recommendation>, RankingError>
where
    S: FacilityScorer + ?Sized,
{
    if facilities.is_empty() {
        return Err(EmptyStage::Candidates.into());
    }

    let candidates = within_radius(facilities, query, config.radius_km);
    if candidates.is_empty() {
        return Err(EmptyStage::Radius {
            radius_km: config.radius_km,
        }
        .into());
    }
    log::debug!(
        "scoring {} of {} facilities",
        candidates.len(),
        facilities.len()
    );

    let mut scored: Vec<(Candidate<'_>, f64)> = candidates
        .into_par_iter()
        .filter_map(|candidate| {
            candidate.map(|candidate| (candidate, scorer.score(&candidate, query)))
        })
        .filter(|(_, score)| *score > 0.0)
        .collect();
    if scored.is_empty() {
        return Err(EmptyStage::Score {
            service: query.service().to_owned(),
        }
        .into());
    }

    scored.sort_by(|(_, left), (_, right)| descending(*left, *right));
    scored.truncate(config.top_k);
    log::debug!("returning {} recommendations", scored.len());
    Ok(scored
        .into_iter()
        .map(|(candidate, score)| {
            Recommendation::new(candidate.facility, score, candidate.distance_km)
        })
        .collect())
}

/// Candidates surviving the radius filter, in input order.
///
/// Facilities with invalid coordinates are kept as unscorable (`None`) so
/// they reach the score filter, where they drop out with a zero score.
fn within_radius<'a>(
    facilities: &'a [Facility],
    query: &Query,
    radius_km: f64,
) -> Vec<Option<Candidate<'a>>> {
    let origin = query.location();
    if origin.is_none() {
        log::info!("visitor location unresolved; skipping the radius filter");
    }
    facilities
        .iter()
        .filter_map(|facility| match distance_km(origin, facility.location) {
            Ok(distance) => {
                let inside = origin.is_none()
                    || distance.is_some_and(|distance| distance <= radius_km);
                inside.then_some(Some(Candidate {
                    facility,
                    distance_km: distance,
                }))
            }
            Err(err) => {
                log::warn!("scoring '{}' as 0.0: {err}", facility.name);
                Some(None)
            }
        })
        .collect()
}

fn descending(left: f64, right: f64) -> Ordering {
    right.total_cmp(&left)
}
