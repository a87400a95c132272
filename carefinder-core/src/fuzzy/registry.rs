//! The registry of linguistic variables consulted by the inference engine.
//!
//! [`VariableRegistry::standard`] holds the seven facility-scoring inputs and
//! the `recommendation` output. Further variables can be registered through
//! [`VariableRegistry::new`] without touching the engine.

use thiserror::Error;

use super::error::VariableError;
use super::membership::Trapezoid;
use super::universe::Universe;
use super::variable::LinguisticVariable;

/// Name of the output variable of the standard registry.
pub const RECOMMENDATION: &str = "recommendation";

/// The seven antecedent variables of the standard rule base.
///
/// # Examples
/// ```
/// use carefinder_core::InputVariable;
///
/// assert_eq!(InputVariable::UserCostPref.as_str(), "user_cost_pref");
/// assert_eq!("proximity".parse::<InputVariable>(), Ok(InputVariable::Proximity));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputVariable {
    /// Cost category of the facility.
    Cost,
    /// Curated quality score.
    Quality,
    /// Aggregate user rating.
    UserRating,
    /// Textual match between the requested service and the facility.
    ServiceMatch,
    /// The visitor's cost preference.
    UserCostPref,
    /// The visitor's quality preference.
    UserQualityPref,
    /// Exponentially decayed closeness to the visitor.
    Proximity,
}

impl InputVariable {
    /// Every input variable, in registry order.
    pub const ALL: [Self; 7] = [
        Self::Cost,
        Self::Quality,
        Self::UserRating,
        Self::ServiceMatch,
        Self::UserCostPref,
        Self::UserQualityPref,
        Self::Proximity,
    ];

    /// Return the variable's registry name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::Quality => "quality",
            Self::UserRating => "user_rating",
            Self::ServiceMatch => "service_match",
            Self::UserCostPref => "user_cost_pref",
            Self::UserQualityPref => "user_quality_pref",
            Self::Proximity => "proximity",
        }
    }
}

impl std::fmt::Display for InputVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name is not one of the standard input variables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown input variable '{0}'")]
pub struct ParseInputVariableError(pub String);

impl std::str::FromStr for InputVariable {
    type Err = ParseInputVariableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variable| variable.as_str() == s)
            .ok_or_else(|| ParseInputVariableError(s.to_owned()))
    }
}

type TermTable = &'static [(&'static str, [f64; 4])];

const PREFERENCE_TERMS: TermTable = &[
    ("low", [0.0, 0.0, 0.2, 0.4]),
    ("medium", [0.3, 0.5, 0.7, 0.9]),
    ("high", [0.6, 0.8, 1.0, 1.0]),
];

/// `(name, [start, end, step], terms)` for each standard input.
const STANDARD_INPUTS: [(InputVariable, [f64; 3], TermTable); 7] = [
    (
        InputVariable::Cost,
        [1.0, 3.0, 0.1],
        &[
            ("low", [1.0, 1.0, 1.2, 1.8]),
            ("medium", [1.2, 1.8, 2.2, 2.8]),
            ("high", [2.2, 2.8, 3.0, 3.0]),
        ],
    ),
    (
        InputVariable::Quality,
        [3.0, 5.0, 0.1],
        &[
            ("low", [3.0, 3.0, 3.4, 3.8]),
            ("medium", [3.4, 3.8, 4.2, 4.6]),
            ("high", [4.2, 4.6, 5.0, 5.0]),
        ],
    ),
    (
        InputVariable::UserRating,
        [1.0, 5.0, 0.1],
        &[
            ("low", [1.0, 1.0, 2.0, 3.0]),
            ("medium", [2.0, 3.0, 3.5, 4.0]),
            ("high", [3.5, 4.0, 5.0, 5.0]),
        ],
    ),
    (
        InputVariable::ServiceMatch,
        [0.0, 1.0, 0.1],
        &[("low", [0.0, 0.0, 0.3, 0.6]), ("high", [0.4, 0.7, 1.0, 1.0])],
    ),
    (InputVariable::UserCostPref, [0.0, 1.0, 0.1], PREFERENCE_TERMS),
    (
        InputVariable::UserQualityPref,
        [0.0, 1.0, 0.1],
        PREFERENCE_TERMS,
    ),
    (
        InputVariable::Proximity,
        [0.0, 1.0, 0.1],
        &[
            ("far", [0.0, 0.0, 0.2, 0.4]),
            ("medium", [0.3, 0.4, 0.6, 0.7]),
            ("near", [0.6, 0.7, 0.9, 1.0]),
            ("very_near", [0.8, 0.9, 1.0, 1.0]),
        ],
    ),
];

const STANDARD_OUTPUT: ([f64; 3], TermTable) = (
    [0.0, 1.0, 0.1],
    &[
        ("low", [0.0, 0.0, 0.3, 0.5]),
        ("medium", [0.4, 0.5, 0.6, 0.7]),
        ("high", [0.6, 0.7, 1.0, 1.0]),
    ],
);

/// Immutable set of input variables plus one output variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableRegistry {
    inputs: Vec<LinguisticVariable>,
    output: LinguisticVariable,
}

impl VariableRegistry {
    /// Validate and assemble a registry.
    ///
    /// # Errors
    /// Returns [`VariableError::DuplicateVariable`] when two variables share a
    /// name and [`VariableError::NoTerms`] when a variable has no terms.
    pub fn new(
        inputs: Vec<LinguisticVariable>,
        output: LinguisticVariable,
    ) -> Result<Self, VariableError> {
        for (index, variable) in inputs.iter().chain(std::iter::once(&output)).enumerate() {
            if variable.terms().is_empty() {
                return Err(VariableError::NoTerms {
                    variable: variable.name().to_owned(),
                });
            }
            let repeated = inputs
                .iter()
                .take(index)
                .any(|earlier| earlier.name() == variable.name());
            if repeated {
                return Err(VariableError::DuplicateVariable {
                    variable: variable.name().to_owned(),
                });
            }
        }
        Ok(Self { inputs, output })
    }

    /// The fixed registry used to score facilities.
    #[must_use]
    pub fn standard() -> Self {
        let inputs = STANDARD_INPUTS
            .iter()
            .map(|&(variable, [start, end, step], terms)| {
                LinguisticVariable::fixed(variable.as_str(), Universe::grid(start, end, step), terms)
            })
            .collect();
        let ([start, end, step], terms) = STANDARD_OUTPUT;
        let output = LinguisticVariable::fixed(RECOMMENDATION, Universe::grid(start, end, step), terms);
        Self { inputs, output }
    }

    /// Look up an input variable by name.
    #[must_use]
    pub fn input(&self, name: &str) -> Option<&LinguisticVariable> {
        self.inputs.iter().find(|variable| variable.name() == name)
    }

    /// Input variables in registration order.
    #[must_use]
    pub fn inputs(&self) -> &[LinguisticVariable] {
        &self.inputs
    }

    /// The output (consequent) variable.
    #[must_use]
    pub const fn output(&self) -> &LinguisticVariable {
        &self.output
    }

    /// Look up any variable, input or output, by name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.input(name)
            .or_else(|| (self.output.name() == name).then_some(&self.output))
    }

    /// Return the membership function of `term` on `variable`.
    #[must_use]
    pub fn term(&self, variable: &str, term: &str) -> Option<&Trapezoid> {
        self.variable(variable).and_then(|found| found.term(term))
    }

    /// Membership degree of `x` in every term of `variable`.
    #[must_use]
    pub fn fuzzify(&self, variable: &str, x: f64) -> Option<Vec<(&str, f64)>> {
        self.variable(variable).map(|found| found.fuzzify(x))
    }
}
