//! Recursive evaluation of configuration trees
//!
//! Evaluation runs in three passes over a read-only input:
//! 1. walk the tree depth-first and classify every string leaf;
//! 2. look up each distinct variable name once, in order of first appearance;
//! 3. rebuild a new tree of identical shape, substituting resolved values and
//!    collecting every failure.
//!
//! The call is all-or-nothing: any failure discards the rebuilt tree.

use std::collections::{BTreeSet, HashMap};

use keel_domain::{ConfigValue, DomainError, Reference};

use super::outcome::{
    EvaluationError, EvaluationOutcome, LocatedFailure, Location, ResolutionFailure,
};
use super::parser::{Placeholder, parse_placeholder};
use crate::ports::{Variables, VariablesError};

/// Evaluates every placeholder in `raw` against `variables`.
///
/// Non-placeholder data, mapping keys and the overall shape are preserved.
/// A placeholder resolving to a structured value is substituted as that
/// structure, not as a string.
///
/// Lookups are sequential; a slow source slows the call down but is never
/// retried here.
///
/// # Errors
///
/// Returns an [`EvaluationError`] listing every unresolved, malformed or
/// failed reference in the tree. If a source reports a systemic failure
/// (see [`VariablesError::is_systemic`]), no further names are looked up and
/// the error is marked as aborted.
pub async fn evaluate<V>(
    raw: &ConfigValue,
    variables: &V,
) -> Result<EvaluationOutcome, EvaluationError>
where
    V: Variables + ?Sized,
{
    let mut leaves = Vec::new();
    classify(raw, &Location::root(), &mut leaves);

    let mut lookups: HashMap<String, Lookup> = HashMap::new();
    let mut aborted = false;

    for leaf in &leaves {
        let Leaf::Reference { reference, .. } = leaf else {
            continue;
        };
        let name = reference.name();
        if lookups.contains_key(name) {
            continue;
        }

        let lookup = if aborted {
            Lookup::Skipped
        } else {
            match variables.get(name).await {
                Ok(Some(value)) => Lookup::Found(value),
                Ok(None) => Lookup::Missing,
                Err(error) => {
                    if error.is_systemic() {
                        tracing::warn!(variable = name, %error, "variables backend unavailable, skipping remaining lookups");
                        aborted = true;
                    }
                    Lookup::Failed(error)
                }
            }
        };
        lookups.insert(name.to_string(), lookup);
    }

    tracing::debug!(
        leaves = leaves.len(),
        names = lookups.len(),
        aborted,
        "looked up configuration variables"
    );

    let mut substitution = Substitution {
        lookups: &lookups,
        failures: Vec::new(),
        resolved_names: BTreeSet::new(),
        secrets: BTreeSet::new(),
    };
    let mut remaining = leaves.into_iter();
    let result = substitution.rebuild(raw, &mut remaining);

    if substitution.failures.is_empty() && !aborted {
        Ok(EvaluationOutcome::new(
            result,
            substitution.resolved_names,
            substitution.secrets,
        ))
    } else {
        Err(EvaluationError::new(substitution.failures, aborted))
    }
}

/// Evaluator bound to one variables source.
///
/// Holds no state between calls; one instance can serve many concurrent
/// evaluations.
#[derive(Debug, Clone)]
pub struct Evaluator<V> {
    variables: V,
}

impl<V: Variables> Evaluator<V> {
    /// Creates an evaluator over `variables`.
    #[must_use]
    pub const fn new(variables: V) -> Self {
        Self { variables }
    }

    /// Evaluates `raw`. See [`evaluate`].
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluationError`] if any reference fails to resolve.
    pub async fn evaluate(&self, raw: &ConfigValue) -> Result<EvaluationOutcome, EvaluationError> {
        evaluate(raw, &self.variables).await
    }
}

/// Classification of a string leaf, in depth-first order.
enum Leaf {
    Literal,
    Reference {
        location: Location,
        reference: Reference,
    },
    Malformed {
        location: Location,
        reason: String,
    },
}

enum Lookup {
    Found(ConfigValue),
    Missing,
    Failed(VariablesError),
    Skipped,
}

fn classify(value: &ConfigValue, location: &Location, leaves: &mut Vec<Leaf>) {
    match value {
        ConfigValue::String(raw) => leaves.push(match parse_placeholder(raw) {
            Placeholder::Literal => Leaf::Literal,
            Placeholder::Reference(reference) => Leaf::Reference {
                location: location.clone(),
                reference,
            },
            Placeholder::Malformed { reason } => Leaf::Malformed {
                location: location.clone(),
                reason,
            },
        }),
        ConfigValue::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                classify(item, &location.index(i), leaves);
            }
        }
        ConfigValue::Mapping(map) => {
            for (key, item) in map {
                classify(item, &location.key(key), leaves);
            }
        }
        ConfigValue::Null | ConfigValue::Bool(_) | ConfigValue::Number(_) => {}
    }
}

struct Substitution<'a> {
    lookups: &'a HashMap<String, Lookup>,
    failures: Vec<LocatedFailure>,
    resolved_names: BTreeSet<String>,
    secrets: BTreeSet<String>,
}

impl Substitution<'_> {
    /// Rebuilds `value`, consuming one classified leaf per string, in the
    /// same depth-first order as [`classify`].
    fn rebuild(&mut self, value: &ConfigValue, leaves: &mut impl Iterator<Item = Leaf>) -> ConfigValue {
        match value {
            ConfigValue::String(_) => match leaves.next() {
                Some(Leaf::Reference {
                    location,
                    reference,
                }) => self.substitute(value, location, reference),
                Some(Leaf::Malformed { location, reason }) => {
                    self.fail(
                        location,
                        ResolutionFailure::MalformedReference {
                            raw: value.as_str().unwrap_or_default().to_string(),
                            reason,
                        },
                    );
                    value.clone()
                }
                Some(Leaf::Literal) | None => value.clone(),
            },
            ConfigValue::Sequence(items) => ConfigValue::Sequence(
                items.iter().map(|item| self.rebuild(item, leaves)).collect(),
            ),
            ConfigValue::Mapping(map) => ConfigValue::Mapping(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.rebuild(item, leaves)))
                    .collect(),
            ),
            ConfigValue::Null | ConfigValue::Bool(_) | ConfigValue::Number(_) => value.clone(),
        }
    }

    fn substitute(
        &mut self,
        original: &ConfigValue,
        location: Location,
        reference: Reference,
    ) -> ConfigValue {
        let lookup = self.lookups.get(reference.name());

        match lookup {
            Some(Lookup::Found(found)) => match reference.project(found) {
                Ok(projected) => {
                    let mut strings = Vec::new();
                    projected.collect_strings(&mut strings);
                    self.secrets.extend(strings.into_iter().map(str::to_string));
                    self.resolved_names.insert(reference.name().to_string());
                    projected.clone()
                }
                Err(error) => {
                    let (field, reason) = match error {
                        DomainError::FieldNotFound { field, reason } => (field, reason),
                        other => (String::new(), other.to_string()),
                    };
                    self.fail(
                        location,
                        ResolutionFailure::FieldNotFound {
                            reference,
                            field,
                            reason,
                        },
                    );
                    original.clone()
                }
            },
            Some(Lookup::Missing) => {
                self.fail(location, ResolutionFailure::NotFound { reference });
                original.clone()
            }
            Some(Lookup::Failed(source)) => {
                let source = source.clone();
                self.fail(location, ResolutionFailure::ResolverFailure { reference, source });
                original.clone()
            }
            // Never looked up because a backend outage stopped resolution.
            Some(Lookup::Skipped) | None => original.clone(),
        }
    }

    fn fail(&mut self, location: Location, failure: ResolutionFailure) {
        self.failures.push(LocatedFailure { location, failure });
    }
}
