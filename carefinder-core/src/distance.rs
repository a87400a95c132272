//! Great-circle distances between resolved locations.

use geo::{Coord, Distance, Geodesic, Point};

use crate::normalise::NormaliseError;

/// Reject coordinates outside the WGS84 range.
///
/// # Errors
/// Returns [`NormaliseError::InvalidCoordinates`] when latitude lies outside
/// `-90..=90`, longitude outside `-180..=180`, or either is not finite.
pub fn validate_location(location: Coord<f64>) -> Result<(), NormaliseError> {
    let Coord { x: lon, y: lat } = location;
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(NormaliseError::InvalidCoordinates { lat, lon })
    }
}

/// Geodesic distance in kilometres on the WGS84 ellipsoid.
///
/// # Errors
/// Returns [`NormaliseError::InvalidCoordinates`] when either end is out of
/// range.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use carefinder_core::great_circle_km;
///
/// # fn main() -> Result<(), carefinder_core::NormaliseError> {
/// let ikeja = Coord { x: 3.3515, y: 6.6018 };
/// assert_eq!(great_circle_km(ikeja, ikeja)?, 0.0);
/// # Ok(())
/// # }
/// ```
#[expect(clippy::float_arithmetic, reason = "metres to kilometres")]
pub fn great_circle_km(from: Coord<f64>, to: Coord<f64>) -> Result<f64, NormaliseError> {
    validate_location(from)?;
    validate_location(to)?;
    let metres = Geodesic.distance(Point::from(from), Point::from(to));
    Ok(metres / 1000.0)
}

/// Distance between two optional locations; `None` when either is unresolved.
///
/// Resolved ends are validated even when the other end is missing.
///
/// # Errors
/// Returns [`NormaliseError::InvalidCoordinates`] when a resolved end is out
/// of range.
pub fn distance_km(
    from: Option<Coord<f64>>,
    to: Option<Coord<f64>>,
) -> Result<Option<f64>, NormaliseError> {
    match (from, to) {
        (Some(start), Some(end)) => great_circle_km(start, end).map(Some),
        (start, end) => {
            start.into_iter().chain(end).try_for_each(validate_location)?;
            Ok(None)
        }
    }
}
