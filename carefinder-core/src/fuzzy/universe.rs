//! Discretised universes of discourse.

use super::error::UniverseError;

/// Upper bound on the number of grid points a universe may hold.
const MAX_POINTS: f64 = 1_000_000.0;

/// Grid points are rounded to this many steps per unit so that repeated
/// additions of `0.1` land on the literal values.
const GRID_PRECISION: f64 = 1e9;

/// Tolerance used when counting how many steps fit between the bounds.
const STEP_EPSILON: f64 = 1e-9;

/// An evenly spaced, inclusive grid `start, start + step, ..., end`.
///
/// # Examples
/// ```
/// use carefinder_core::Universe;
///
/// # fn main() -> Result<(), carefinder_core::fuzzy::UniverseError> {
/// let universe = Universe::new(0.0, 1.0, 0.1)?;
/// assert_eq!(universe.points().len(), 11);
/// assert_eq!(universe.points()[3], 0.3);
/// assert_eq!(universe.clamp(1.7), 1.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    start: f64,
    end: f64,
    step: f64,
    points: Vec<f64>,
}

impl Universe {
    /// Validate the bounds and step and build the grid.
    ///
    /// # Errors
    /// Returns [`UniverseError::NonFinite`] for NaN or infinite parameters,
    /// [`UniverseError::NonPositiveStep`] when `step <= 0`,
    /// [`UniverseError::InvertedBounds`] when `end < start`, and
    /// [`UniverseError::TooManyPoints`] when the grid would be unreasonably
    /// fine.
    #[expect(
        clippy::float_arithmetic,
        reason = "grid size is derived from the span and step"
    )]
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self, UniverseError> {
        if !(start.is_finite() && end.is_finite() && step.is_finite()) {
            return Err(UniverseError::NonFinite);
        }
        if step <= 0.0 {
            return Err(UniverseError::NonPositiveStep { step });
        }
        if end < start {
            return Err(UniverseError::InvertedBounds { start, end });
        }
        if (end - start) / step > MAX_POINTS {
            return Err(UniverseError::TooManyPoints { start, end, step });
        }
        Ok(Self::grid(start, end, step))
    }

    /// Build a grid from parameters already known to be valid.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the step count is a small, non-negative whole number"
    )]
    pub(crate) fn grid(start: f64, end: f64, step: f64) -> Self {
        let steps = ((end - start) / step + STEP_EPSILON).floor() as u32;
        let points = (0..=steps)
            .map(|index| {
                let value = start + step * f64::from(index);
                (value * GRID_PRECISION).round() / GRID_PRECISION
            })
            .collect();
        Self {
            start,
            end,
            step,
            points,
        }
    }

    /// Lower bound of the universe.
    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    /// Upper bound of the universe.
    #[must_use]
    pub const fn end(&self) -> f64 {
        self.end
    }

    /// Spacing between neighbouring grid points.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// The grid points in ascending order.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Clamp a crisp value to the universe bounds.
    ///
    /// Inputs are never extrapolated beyond the grid's endpoints.
    #[must_use]
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.start, self.end)
    }
}
