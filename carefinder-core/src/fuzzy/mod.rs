//! Mamdani fuzzy inference primitives.
//!
//! Membership functions, universes, linguistic variables, the rule base and
//! the inference engine. The facility-scoring model is available through
//! [`VariableRegistry::standard`], [`RuleBase::standard`] and
//! [`InferenceEngine::shared`].

mod engine;
mod error;
mod membership;
mod registry;
mod rules;
mod universe;
mod variable;

pub use engine::{FuzzyInputs, Inference, InferenceEngine, centroid};
pub use error::{InferenceError, MembershipError, RuleError, UniverseError, VariableError};
pub use membership::Trapezoid;
pub use registry::{InputVariable, ParseInputVariableError, RECOMMENDATION, VariableRegistry};
pub use rules::{Antecedent, Consequent, Rule, RuleBase};
pub use universe::Universe;
pub use variable::{LinguisticVariable, Term};
