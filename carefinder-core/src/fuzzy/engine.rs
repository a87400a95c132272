//! Mamdani inference: fuzzify, fire rules, clip, aggregate, defuzzify.
//!
//! [`InferenceEngine`] owns an immutable registry and rule base. Each call to
//! [`InferenceEngine::infer`] builds its own aggregate curve, so one engine can
//! serve many threads without locking.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::error::{InferenceError, RuleError};
use super::registry::{InputVariable, VariableRegistry};
use super::rules::{Rule, RuleBase};

static STANDARD: LazyLock<InferenceEngine> = LazyLock::new(InferenceEngine::standard);

/// Crisp values keyed by input variable name.
///
/// # Examples
/// ```
/// use carefinder_core::{FuzzyInputs, InputVariable};
///
/// let inputs = FuzzyInputs::new()
///     .with_input(InputVariable::Cost, 2.0)
///     .with("custom", 0.5);
/// assert_eq!(inputs.get("cost"), Some(2.0));
/// assert_eq!(inputs.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FuzzyInputs {
    values: BTreeMap<String, f64>,
}

impl FuzzyInputs {
    /// Construct an empty input set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the crisp value of `variable`.
    pub fn set(&mut self, variable: impl Into<String>, value: f64) {
        self.values.insert(variable.into(), value);
    }

    /// Insert a value while returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, variable: impl Into<String>, value: f64) -> Self {
        self.set(variable, value);
        self
    }

    /// Insert the value of one of the standard inputs.
    #[must_use]
    pub fn with_input(self, variable: InputVariable, value: f64) -> Self {
        self.with(variable.as_str(), value)
    }

    /// Return the crisp value of `variable`, if present.
    #[must_use]
    pub fn get(&self, variable: &str) -> Option<f64> {
        self.values.get(variable).copied()
    }

    /// Iterate over `(variable, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values
            .iter()
            .map(|(variable, value)| (variable.as_str(), *value))
    }

    /// Number of supplied values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Report whether no values were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Full trace of one inference run.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    /// Defuzzified crisp score in `0.0..=1.0`.
    pub score: f64,
    /// Firing strength of each rule, in rule-base order.
    pub firing: Vec<f64>,
    /// Aggregate output membership sampled over the output universe.
    pub aggregate: Vec<f64>,
}

/// Stateless Mamdani inference over a fixed registry and rule base.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    registry: VariableRegistry,
    rules: RuleBase,
    /// Unclipped consequent curve of each rule over the output universe.
    consequents: Vec<Vec<f64>>,
}

impl InferenceEngine {
    /// Validate `rules` against `registry` and build an engine.
    ///
    /// # Errors
    /// Returns [`RuleError`] when a rule refers to something the registry
    /// does not define.
    pub fn new(registry: VariableRegistry, rules: Vec<Rule>) -> Result<Self, RuleError> {
        let rules = RuleBase::new(rules, &registry)?;
        Ok(Self::assemble(registry, rules))
    }

    /// The facility-scoring engine: standard registry and rule base.
    #[must_use]
    pub fn standard() -> Self {
        Self::assemble(VariableRegistry::standard(), RuleBase::standard())
    }

    /// Process-wide instance of [`InferenceEngine::standard`].
    #[must_use]
    pub fn shared() -> &'static Self {
        &STANDARD
    }

    fn assemble(registry: VariableRegistry, rules: RuleBase) -> Self {
        let output = registry.output();
        let width = output.universe().points().len();
        let consequents = rules
            .rules()
            .iter()
            .map(|rule| {
                output
                    .curve(rule.consequent().term())
                    .unwrap_or_else(|| vec![0.0; width])
            })
            .collect();
        Self {
            registry,
            rules,
            consequents,
        }
    }

    /// The engine's variable registry.
    #[must_use]
    pub const fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    /// The engine's rule base.
    #[must_use]
    pub const fn rules(&self) -> &RuleBase {
        &self.rules
    }

    /// Degree to which `rule`'s antecedent holds for `inputs`.
    ///
    /// # Errors
    /// Returns [`InferenceError::MissingInput`] or
    /// [`InferenceError::NonFiniteInput`] when a referenced input is absent or
    /// not finite, and [`InferenceError::UnknownTerm`] when the rule names a
    /// term outside the registry.
    pub fn firing_strength(
        &self,
        rule: &Rule,
        inputs: &FuzzyInputs,
    ) -> Result<f64, InferenceError> {
        rule.antecedent()
            .evaluate(&mut |variable: &str, term: &str| self.degree(inputs, variable, term))
    }

    fn degree(
        &self,
        inputs: &FuzzyInputs,
        variable: &str,
        term: &str,
    ) -> Result<f64, InferenceError> {
        let value = inputs
            .get(variable)
            .ok_or_else(|| InferenceError::MissingInput {
                variable: variable.to_owned(),
            })?;
        if !value.is_finite() {
            return Err(InferenceError::NonFiniteInput {
                variable: variable.to_owned(),
                value,
            });
        }
        self.registry
            .input(variable)
            .and_then(|found| found.membership(term, value))
            .ok_or_else(|| InferenceError::UnknownTerm {
                variable: variable.to_owned(),
                term: term.to_owned(),
            })
    }

    /// Run inference and keep the intermediate firing strengths and curve.
    ///
    /// # Errors
    /// Propagates [`InferenceError`] from [`InferenceEngine::firing_strength`].
    pub fn evaluate(&self, inputs: &FuzzyInputs) -> Result<Inference, InferenceError> {
        let points = self.registry.output().universe().points();
        let mut aggregate = vec![0.0_f64; points.len()];
        let mut firing = Vec::with_capacity(self.rules.len());
        for (rule, consequent) in self.rules.rules().iter().zip(&self.consequents) {
            let strength = self.firing_strength(rule, inputs)?;
            for (slot, mu) in aggregate.iter_mut().zip(consequent) {
                *slot = slot.max(mu.min(strength));
            }
            firing.push(strength);
        }
        let score = centroid(points, &aggregate);
        Ok(Inference {
            score,
            firing,
            aggregate,
        })
    }

    /// Infer the crisp recommendation score for `inputs`.
    ///
    /// Returns `0.0` when no rule fires.
    ///
    /// # Errors
    /// Propagates [`InferenceError`] from [`InferenceEngine::evaluate`].
    ///
    /// # Examples
    /// ```
    /// use carefinder_core::{FuzzyInputs, InferenceEngine, InputVariable::*};
    ///
    /// # fn main() -> Result<(), carefinder_core::InferenceError> {
    /// let inputs = FuzzyInputs::new()
    ///     .with_input(Cost, 1.0)
    ///     .with_input(Quality, 4.8)
    ///     .with_input(UserRating, 4.5)
    ///     .with_input(ServiceMatch, 1.0)
    ///     .with_input(UserCostPref, 0.33)
    ///     .with_input(UserQualityPref, 1.0)
    ///     .with_input(Proximity, 1.0);
    /// let score = InferenceEngine::shared().infer(&inputs)?;
    /// assert!(score > 0.6);
    /// # Ok(())
    /// # }
    /// ```
    pub fn infer(&self, inputs: &FuzzyInputs) -> Result<f64, InferenceError> {
        self.evaluate(inputs).map(|inference| inference.score)
    }
}

/// Centre of mass of `curve` sampled at `points`.
///
/// Returns `0.0` when the curve carries no mass.
///
/// # Examples
/// ```
/// use carefinder_core::fuzzy::centroid;
///
/// let points = [0.0, 0.25, 0.5, 0.75, 1.0];
/// assert_eq!(centroid(&points, &[1.0; 5]), 0.5);
/// assert_eq!(centroid(&points, &[0.0; 5]), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "centroid defuzzification is a weighted mean"
)]
pub fn centroid(points: &[f64], curve: &[f64]) -> f64 {
    let (moment, mass) = points
        .iter()
        .zip(curve)
        .fold((0.0_f64, 0.0_f64), |(moment, mass), (x, mu)| {
            (moment + x * mu, mass + mu)
        });
    if mass <= 0.0 || !mass.is_finite() {
        return 0.0;
    }
    moment / mass
}
