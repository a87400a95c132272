//! Linguistic variables: a universe plus named membership functions.

use super::error::VariableError;
use super::membership::Trapezoid;
use super::universe::Universe;

/// A named term of a linguistic variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    name: String,
    shape: Trapezoid,
}

impl Term {
    /// Term name, e.g. `"low"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Membership function of the term.
    #[must_use]
    pub const fn shape(&self) -> &Trapezoid {
        &self.shape
    }
}

/// A quantity reasoned about through qualitative terms.
///
/// Every term shares the variable's [`Universe`]. Crisp inputs are clamped to
/// the universe before any membership lookup.
///
/// # Examples
/// ```
/// use carefinder_core::{LinguisticVariable, Trapezoid, Universe};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let cost = LinguisticVariable::new("cost", Universe::new(1.0, 3.0, 0.1)?)?
///     .with_term("low", Trapezoid::new(1.0, 1.0, 1.2, 1.8)?)?
///     .with_term("high", Trapezoid::new(2.2, 2.8, 3.0, 3.0)?)?;
/// assert_eq!(cost.membership("low", 0.0), Some(1.0));
/// assert_eq!(cost.membership("high", 9.0), Some(1.0));
/// assert!(cost.membership("premium", 2.0).is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    name: String,
    universe: Universe,
    terms: Vec<Term>,
}

impl LinguisticVariable {
    /// Create a variable without terms.
    ///
    /// # Errors
    /// Returns [`VariableError::BlankName`] when `name` is blank.
    pub fn new(name: impl Into<String>, universe: Universe) -> Result<Self, VariableError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(VariableError::BlankName);
        }
        Ok(Self {
            name,
            universe,
            terms: Vec::new(),
        })
    }

    /// Build a variable from data already known to be consistent.
    pub(crate) fn fixed(name: &str, universe: Universe, terms: &[(&str, [f64; 4])]) -> Self {
        Self {
            name: name.to_owned(),
            universe,
            terms: terms
                .iter()
                .map(|&(term, breakpoints)| Term {
                    name: term.to_owned(),
                    shape: Trapezoid::from_breakpoints(breakpoints),
                })
                .collect(),
        }
    }

    /// Add a term while consuming `self`, enabling chaining.
    ///
    /// # Errors
    /// Returns [`VariableError::BlankName`] for a blank term name and
    /// [`VariableError::DuplicateTerm`] when the term already exists.
    pub fn with_term(
        mut self,
        name: impl Into<String>,
        shape: Trapezoid,
    ) -> Result<Self, VariableError> {
        let term = name.into();
        if term.trim().is_empty() {
            return Err(VariableError::BlankName);
        }
        if self.term(&term).is_some() {
            return Err(VariableError::DuplicateTerm {
                variable: self.name,
                term,
            });
        }
        self.terms.push(Term { name: term, shape });
        Ok(self)
    }

    /// Variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared universe of every term.
    #[must_use]
    pub const fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Terms in declaration order.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Look up a term's membership function.
    #[must_use]
    pub fn term(&self, name: &str) -> Option<&Trapezoid> {
        self.terms
            .iter()
            .find(|term| term.name == name)
            .map(|term| &term.shape)
    }

    /// Degree to which `x` belongs to `term`, or `None` for an unknown term.
    #[must_use]
    pub fn membership(&self, term: &str, x: f64) -> Option<f64> {
        let clamped = self.universe.clamp(x);
        self.term(term).map(|shape| shape.degree(clamped))
    }

    /// Fuzzify `x` against every term, in declaration order.
    #[must_use]
    pub fn fuzzify(&self, x: f64) -> Vec<(&str, f64)> {
        let clamped = self.universe.clamp(x);
        self.terms
            .iter()
            .map(|term| (term.name.as_str(), term.shape.degree(clamped)))
            .collect()
    }

    /// Sample a term's membership curve over the universe grid.
    #[must_use]
    pub fn curve(&self, term: &str) -> Option<Vec<f64>> {
        self.term(term)
            .map(|shape| shape.sample(self.universe.points()))
    }
}
