//! Trapezoidal membership functions.
//!
//! A [`Trapezoid`] maps a crisp value to a degree of membership in
//! `0.0..=1.0`. It rises linearly on `[a, b]`, holds at `1.0` on `[b, c]` and
//! falls linearly on `[c, d]`. Equal neighbouring breakpoints collapse the
//! corresponding ramp into a step.

use super::error::MembershipError;

/// A trapezoidal membership function with breakpoints `a <= b <= c <= d`.
///
/// # Examples
/// ```
/// use carefinder_core::Trapezoid;
///
/// # fn main() -> Result<(), carefinder_core::fuzzy::MembershipError> {
/// let medium = Trapezoid::new(1.2, 1.8, 2.2, 2.8)?;
/// assert_eq!(medium.degree(2.0), 1.0);
/// assert_eq!(medium.degree(3.0), 0.0);
/// assert!((medium.degree(1.5) - 0.5).abs() < 1e-9);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trapezoid {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Trapezoid {
    /// Validate the breakpoints and construct a [`Trapezoid`].
    ///
    /// # Errors
    /// Returns [`MembershipError::NonFinite`] when a breakpoint is NaN or
    /// infinite and [`MembershipError::Unordered`] when the breakpoints are
    /// not ordered `a <= b <= c <= d`.
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Result<Self, MembershipError> {
        if [a, b, c, d].iter().any(|value| !value.is_finite()) {
            return Err(MembershipError::NonFinite);
        }
        if a > b || b > c || c > d {
            return Err(MembershipError::Unordered { a, b, c, d });
        }
        Ok(Self { a, b, c, d })
    }

    /// Build a trapezoid from breakpoints already known to be ordered.
    pub(crate) const fn from_breakpoints([a, b, c, d]: [f64; 4]) -> Self {
        Self { a, b, c, d }
    }

    /// Return the breakpoints as `[a, b, c, d]`.
    #[must_use]
    pub const fn breakpoints(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Degree of membership of `x`.
    ///
    /// Always within `0.0..=1.0`. NaN maps to `0.0`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "linear ramps interpolate between breakpoints"
    )]
    pub fn degree(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }
        if self.b <= x && x <= self.c {
            return 1.0;
        }
        if x <= self.a || x >= self.d {
            return 0.0;
        }
        let raw = if x < self.b {
            (x - self.a) / (self.b - self.a)
        } else {
            (self.d - x) / (self.d - self.c)
        };
        raw.clamp(0.0, 1.0)
    }

    /// Sample the membership curve at every point in `points`.
    #[must_use]
    pub fn sample(&self, points: &[f64]) -> Vec<f64> {
        points.iter().map(|&x| self.degree(x)).collect()
    }
}

impl TryFrom<[f64; 4]> for Trapezoid {
    type Error = MembershipError;

    fn try_from([a, b, c, d]: [f64; 4]) -> Result<Self, Self::Error> {
        Self::new(a, b, c, d)
    }
}
