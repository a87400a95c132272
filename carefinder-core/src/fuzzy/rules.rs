//! Fuzzy rules and their antecedent expression trees.
//!
//! An [`Antecedent`] is a tagged tree of term lookups joined by `And` (minimum)
//! and `Or` (maximum). Evaluating the tree yields the rule's firing strength.
//! The rule base is unordered; aggregation by maximum makes rule order
//! irrelevant to the inferred score.

use super::error::RuleError;
use super::registry::{InputVariable, RECOMMENDATION, VariableRegistry};

/// A fuzzy proposition over input variables.
///
/// # Examples
/// ```
/// use carefinder_core::Antecedent;
///
/// let expr = Antecedent::or([
///     Antecedent::term("service_match", "low"),
///     Antecedent::and([
///         Antecedent::term("quality", "low"),
///         Antecedent::term("user_quality_pref", "high"),
///     ]),
/// ]);
/// let degree = expr.evaluate(&mut |variable: &str, _term: &str| {
///     Ok::<_, ()>(if variable == "quality" { 0.9 } else { 0.2 })
/// });
/// assert_eq!(degree, Ok(0.2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Antecedent {
    /// Membership of an input variable's crisp value in one of its terms.
    Term {
        /// Input variable name.
        variable: String,
        /// Term of that variable.
        term: String,
    },
    /// Minimum of the children. An empty conjunction is fully true.
    And(Vec<Antecedent>),
    /// Maximum of the children. An empty disjunction is fully false.
    Or(Vec<Antecedent>),
}

impl Antecedent {
    /// Leaf referring to `term` of `variable`.
    #[must_use]
    pub fn term(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self::Term {
            variable: variable.into(),
            term: term.into(),
        }
    }

    /// Conjunction of `children`.
    #[must_use]
    pub fn and(children: impl IntoIterator<Item = Self>) -> Self {
        Self::And(children.into_iter().collect())
    }

    /// Disjunction of `children`.
    #[must_use]
    pub fn or(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    /// Compute the truth degree of the expression.
    ///
    /// `degree` resolves a `(variable, term)` leaf to its membership degree.
    ///
    /// # Errors
    /// Propagates the first error returned by `degree`.
    pub fn evaluate<F, E>(&self, degree: &mut F) -> Result<f64, E>
    where
        F: FnMut(&str, &str) -> Result<f64, E>,
    {
        match self {
            Self::Term { variable, term } => degree(variable, term),
            Self::And(children) => children
                .iter()
                .try_fold(1.0_f64, |acc, child| Ok(acc.min(child.evaluate(degree)?))),
            Self::Or(children) => children
                .iter()
                .try_fold(0.0_f64, |acc, child| Ok(acc.max(child.evaluate(degree)?))),
        }
    }

    /// Visit every `(variable, term)` leaf, stopping at the first error.
    fn try_for_each_term<E>(
        &self,
        visit: &mut impl FnMut(&str, &str) -> Result<(), E>,
    ) -> Result<(), E> {
        match self {
            Self::Term { variable, term } => visit(variable, term),
            Self::And(children) | Self::Or(children) => children
                .iter()
                .try_for_each(|child| child.try_for_each_term(visit)),
        }
    }
}

/// The `(variable, term)` pair a rule concludes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consequent {
    variable: String,
    term: String,
}

impl Consequent {
    /// Conclude `term` of `variable`.
    #[must_use]
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
        }
    }

    /// Output variable name.
    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Output term name.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }
}

/// An antecedent tree paired with a single consequent term.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    antecedent: Antecedent,
    consequent: Consequent,
}

impl Rule {
    /// Pair an antecedent with its consequent.
    #[must_use]
    pub const fn new(antecedent: Antecedent, consequent: Consequent) -> Self {
        Self {
            antecedent,
            consequent,
        }
    }

    /// The rule's condition.
    #[must_use]
    pub const fn antecedent(&self) -> &Antecedent {
        &self.antecedent
    }

    /// The rule's conclusion.
    #[must_use]
    pub const fn consequent(&self) -> &Consequent {
        &self.consequent
    }
}

/// A set of rules whose every reference resolves against a registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBase {
    rules: Vec<Rule>,
}

impl RuleBase {
    /// Validate `rules` against `registry`.
    ///
    /// # Errors
    /// Returns [`RuleError`] when an antecedent names an unknown input
    /// variable or term, or when a consequent does not target a term of the
    /// registry's output variable.
    pub fn new(rules: Vec<Rule>, registry: &VariableRegistry) -> Result<Self, RuleError> {
        for (index, rule) in rules.iter().enumerate() {
            rule.antecedent.try_for_each_term(&mut |variable: &str, term: &str| {
                let input = registry
                    .input(variable)
                    .ok_or_else(|| RuleError::UnknownVariable {
                        rule: index,
                        variable: variable.to_owned(),
                    })?;
                match input.term(term) {
                    Some(_) => Ok(()),
                    None => Err(RuleError::UnknownTerm {
                        rule: index,
                        variable: variable.to_owned(),
                        term: term.to_owned(),
                    }),
                }
            })?;
            let output = registry.output();
            if rule.consequent.variable() != output.name() {
                return Err(RuleError::WrongConsequent {
                    rule: index,
                    variable: rule.consequent.variable().to_owned(),
                    expected: output.name().to_owned(),
                });
            }
            if output.term(rule.consequent.term()).is_none() {
                return Err(RuleError::UnknownTerm {
                    rule: index,
                    variable: output.name().to_owned(),
                    term: rule.consequent.term().to_owned(),
                });
            }
        }
        Ok(Self { rules })
    }

    /// The eight facility-scoring rules over the standard registry.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rules: standard_rules(),
        }
    }

    /// Rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Report whether the rule base is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn is(variable: InputVariable, term: &str) -> Antecedent {
    Antecedent::term(variable.as_str(), term)
}

fn recommend(term: &str) -> Consequent {
    Consequent::new(RECOMMENDATION, term)
}

/// Cost tier agrees with the cost preference for each listed tier.
fn cost_aligned(tiers: &[&str]) -> Antecedent {
    Antecedent::or(tiers.iter().map(|tier| {
        Antecedent::and([
            is(InputVariable::Cost, tier),
            is(InputVariable::UserCostPref, tier),
        ])
    }))
}

fn standard_rules() -> Vec<Rule> {
    use InputVariable::{
        Cost, Proximity, Quality, ServiceMatch, UserCostPref, UserQualityPref, UserRating,
    };

    vec![
        Rule::new(
            Antecedent::and([
                is(ServiceMatch, "high"),
                is(Proximity, "very_near"),
                is(Quality, "high"),
                is(UserRating, "high"),
                cost_aligned(&["low", "medium", "high"]),
                is(UserQualityPref, "high"),
            ]),
            recommend("high"),
        ),
        Rule::new(
            Antecedent::and([
                is(ServiceMatch, "high"),
                is(Proximity, "near"),
                is(Quality, "high"),
                is(UserRating, "medium"),
                cost_aligned(&["low", "medium"]),
                is(UserQualityPref, "high"),
            ]),
            recommend("high"),
        ),
        Rule::new(
            Antecedent::and([
                is(ServiceMatch, "high"),
                is(Proximity, "medium"),
                Antecedent::or([is(Quality, "medium"), is(Quality, "high")]),
                is(UserRating, "medium"),
                cost_aligned(&["low", "medium"]),
            ]),
            recommend("medium"),
        ),
        Rule::new(
            Antecedent::and([
                is(ServiceMatch, "high"),
                is(Proximity, "near"),
                is(Quality, "medium"),
                is(UserRating, "medium"),
                is(UserQualityPref, "medium"),
            ]),
            recommend("medium"),
        ),
        Rule::new(
            Antecedent::or([
                is(ServiceMatch, "low"),
                is(Proximity, "far"),
                Antecedent::and([is(Quality, "low"), is(UserQualityPref, "high")]),
            ]),
            recommend("low"),
        ),
        Rule::new(
            Antecedent::or([
                Antecedent::and([is(Cost, "high"), is(UserCostPref, "low")]),
                Antecedent::and([is(Cost, "medium"), is(UserCostPref, "low")]),
            ]),
            recommend("low"),
        ),
        Rule::new(
            Antecedent::and([
                is(ServiceMatch, "high"),
                is(Proximity, "very_near"),
                is(Quality, "medium"),
                is(UserRating, "high"),
                is(UserQualityPref, "medium"),
                Antecedent::or([is(Cost, "low"), is(Cost, "medium")]),
            ]),
            recommend("high"),
        ),
        Rule::new(
            Antecedent::and([
                is(ServiceMatch, "low"),
                is(Proximity, "very_near"),
                is(Quality, "high"),
                is(UserRating, "high"),
                is(UserQualityPref, "high"),
                is(Cost, "low"),
                is(UserCostPref, "low"),
            ]),
            recommend("medium"),
        ),
    ]
}
