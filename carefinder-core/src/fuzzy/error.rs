//! Error types raised while building or evaluating the fuzzy model.

use thiserror::Error;

/// Errors returned by [`Trapezoid::new`](crate::Trapezoid::new).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MembershipError {
    /// A breakpoint was NaN or infinite.
    #[error("trapezoid breakpoints must be finite")]
    NonFinite,
    /// Breakpoints were not ordered `a <= b <= c <= d`.
    #[error("trapezoid breakpoints must satisfy a <= b <= c <= d (got {a}, {b}, {c}, {d})")]
    Unordered {
        /// Left foot.
        a: f64,
        /// Left shoulder.
        b: f64,
        /// Right shoulder.
        c: f64,
        /// Right foot.
        d: f64,
    },
}

/// Errors returned by [`Universe::new`](crate::Universe::new).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum UniverseError {
    /// A bound or the step was NaN or infinite.
    #[error("universe bounds and step must be finite")]
    NonFinite,
    /// The step was zero or negative.
    #[error("universe step must be positive (got {step})")]
    NonPositiveStep {
        /// Offending step.
        step: f64,
    },
    /// The upper bound lies below the lower bound.
    #[error("universe end {end} lies below start {start}")]
    InvertedBounds {
        /// Lower bound.
        start: f64,
        /// Upper bound.
        end: f64,
    },
    /// The grid would contain too many points.
    #[error("universe [{start}, {end}] with step {step} has too many points")]
    TooManyPoints {
        /// Lower bound.
        start: f64,
        /// Upper bound.
        end: f64,
        /// Requested step.
        step: f64,
    },
}

/// Errors raised while assembling linguistic variables and the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariableError {
    /// A variable or term name was blank.
    #[error("variable and term names must not be blank")]
    BlankName,
    /// A term name was declared twice on the same variable.
    #[error("variable '{variable}' already defines term '{term}'")]
    DuplicateTerm {
        /// Variable being extended.
        variable: String,
        /// Repeated term name.
        term: String,
    },
    /// A variable name was registered twice.
    #[error("variable '{variable}' is registered more than once")]
    DuplicateVariable {
        /// Repeated variable name.
        variable: String,
    },
    /// A variable was registered without any terms.
    #[error("variable '{variable}' defines no terms")]
    NoTerms {
        /// Offending variable name.
        variable: String,
    },
}

/// Errors raised when a rule refers to something the registry lacks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The antecedent names an unregistered input variable.
    #[error("rule {rule} refers to unknown input variable '{variable}'")]
    UnknownVariable {
        /// Zero-based rule position.
        rule: usize,
        /// Missing variable name.
        variable: String,
    },
    /// The antecedent or consequent names a term the variable lacks.
    #[error("rule {rule} refers to unknown term '{term}' of variable '{variable}'")]
    UnknownTerm {
        /// Zero-based rule position.
        rule: usize,
        /// Variable owning the term.
        variable: String,
        /// Missing term name.
        term: String,
    },
    /// The consequent targets a variable other than the registry output.
    #[error("rule {rule} concludes on '{variable}' but the output variable is '{expected}'")]
    WrongConsequent {
        /// Zero-based rule position.
        rule: usize,
        /// Variable named by the rule.
        variable: String,
        /// Registered output variable.
        expected: String,
    },
}

/// Errors raised while running inference for a single input set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    /// The input set lacks a value the rule base needs.
    #[error("no crisp value supplied for input variable '{variable}'")]
    MissingInput {
        /// Variable without a value.
        variable: String,
    },
    /// The supplied crisp value was NaN or infinite.
    #[error("crisp value {value} for input variable '{variable}' is not finite")]
    NonFiniteInput {
        /// Variable with the bad value.
        variable: String,
        /// Offending value.
        value: f64,
    },
    /// A rule refers to a variable or term missing from the registry.
    #[error("unknown term '{term}' of variable '{variable}'")]
    UnknownTerm {
        /// Variable owning the term.
        variable: String,
        /// Missing term name.
        term: String,
    },
}
