//! Nested-loop join evaluation of rules against a fact source

use crate::model::{Atom, Binding, Inference, Issue, LiteralArg, ResourceArg, Rule, Severity};
use itertools::Itertools;
use kotoba_core::model::{Assertion, Iri, Literal, Term};
use kotoba_store::store::{FactSource, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Everything one rule produced against one snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub inferences: Vec<Inference>,
    pub issues: Vec<Issue>,
}

/// Engine failures during evaluation. These abort the run; data problems
/// are reported as issues, never as errors.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Store access failed while evaluating rule '{rule}': {source}")]
    Store {
        rule: String,
        #[source]
        source: StoreError,
    },

    #[error("Rule '{rule}' binds consequent variable '?{variable}' to a literal where a resource is required")]
    LiteralInResourcePosition { rule: String, variable: String },

    #[error("Rule '{rule}' binds consequent variable '?{variable}' to a resource where a literal is required")]
    ResourceInLiteralPosition { rule: String, variable: String },

    #[error("Rule '{rule}' leaves consequent variable '?{variable}' unbound")]
    UnboundConsequentVariable { rule: String, variable: String },
}

/// Class membership cache, built once per run from the active rules and
/// shared read-only across worker tasks.
#[derive(Debug, Clone, Default)]
pub struct TypeCache {
    classes: HashMap<Iri, ClassMembers>,
}

#[derive(Debug, Clone, Default)]
struct ClassMembers {
    ordered: Vec<Iri>,
    set: HashSet<Iri>,
}

impl TypeCache {
    /// One store query per class referenced by the given rules
    pub fn build<'a, S, I>(rules: I, store: &S) -> Result<Self, EvaluationError>
    where
        S: FactSource + ?Sized,
        I: IntoIterator<Item = &'a Rule>,
    {
        let mut classes: HashMap<Iri, ClassMembers> = HashMap::new();
        for rule in rules {
            for class in rule.referenced_classes() {
                if classes.contains_key(class) {
                    continue;
                }
                let ordered =
                    store
                        .class_members(class)
                        .map_err(|source| EvaluationError::Store {
                            rule: rule.name().to_string(),
                            source,
                        })?;
                let set = ordered.iter().cloned().collect();
                classes.insert(class.clone(), ClassMembers { ordered, set });
            }
        }
        Ok(Self { classes })
    }

    /// Members of a cached class, in store order. `None` when the class
    /// was not referenced by the rules the cache was built for.
    pub fn members(&self, class: &Iri) -> Option<&[Iri]> {
        self.classes.get(class).map(|entry| entry.ordered.as_slice())
    }

    /// O(1) membership probe, `None` when the class is not cached
    pub fn contains(&self, class: &Iri, individual: &Iri) -> Option<bool> {
        self.classes
            .get(class)
            .map(|entry| entry.set.contains(individual))
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}

/// Resolution of a resource-position argument under a binding
#[derive(Clone, Copy)]
enum ResourceSlot<'a> {
    Bound(&'a Iri),
    Unbound(&'a str),
    /// Variable bound to a literal; the position is unsatisfiable
    Mismatch,
}

/// Resolution of a literal-position argument under a binding
#[derive(Clone, Copy)]
enum LiteralSlot<'a> {
    Bound(&'a Literal),
    Unbound(&'a str),
    Mismatch,
}

/// Evaluates one rule at a time against an immutable fact source.
pub struct RuleEvaluator<'a, S: FactSource + ?Sized> {
    store: &'a S,
    cache: &'a TypeCache,
}

impl<'a, S: FactSource + ?Sized> RuleEvaluator<'a, S> {
    pub fn new(store: &'a S, cache: &'a TypeCache) -> Self {
        Self { store, cache }
    }

    /// Deduplicated bindings satisfying the antecedent and all builtins,
    /// in first-derivation order.
    pub fn bindings(&self, rule: &Rule) -> Result<Vec<Binding>, EvaluationError> {
        let mut frontier = vec![Binding::new()];
        for atom in rule.antecedent() {
            let mut extended = Vec::new();
            for binding in &frontier {
                self.extend_with_atom(rule, atom, binding, &mut extended)?;
            }
            frontier = extended;
            if frontier.is_empty() {
                break;
            }
        }

        let surviving = frontier
            .into_iter()
            .filter(|binding| rule.builtins().iter().all(|builtin| builtin.holds(binding)))
            .unique()
            .collect();
        Ok(surviving)
    }

    /// Evaluate a rule to its inferences and issues
    pub fn evaluate(&self, rule: &Rule) -> Result<RuleOutcome, EvaluationError> {
        let mut outcome = RuleOutcome::default();
        for binding in self.bindings(rule)? {
            for atom in rule.consequent() {
                let fact = instantiate(rule, atom, &binding)?;
                if atom.is_violation_marker() {
                    outcome.issues.push(render_issue(rule, &fact, &binding));
                }
                outcome.inferences.push(Inference {
                    rule: rule.name().to_string(),
                    fact,
                });
            }
        }
        Ok(outcome)
    }

    fn extend_with_atom(
        &self,
        rule: &Rule,
        atom: &Atom,
        binding: &Binding,
        out: &mut Vec<Binding>,
    ) -> Result<(), EvaluationError> {
        match atom {
            Atom::Class { class, individual } => {
                match resolve_resource(individual, binding) {
                    ResourceSlot::Mismatch => {}
                    ResourceSlot::Bound(iri) => {
                        if self.class_contains(rule, class, iri)? {
                            out.push(binding.clone());
                        }
                    }
                    ResourceSlot::Unbound(variable) => {
                        for member in self.class_list(rule, class)? {
                            let mut next = binding.clone();
                            next.bind(variable, Term::Resource(member));
                            out.push(next);
                        }
                    }
                }
                Ok(())
            }
            Atom::ObjectRelation {
                relation,
                subject,
                object,
            } => {
                let subject_slot = resolve_resource(subject, binding);
                let object_slot = resolve_resource(object, binding);
                if matches!(subject_slot, ResourceSlot::Mismatch)
                    || matches!(object_slot, ResourceSlot::Mismatch)
                {
                    return Ok(());
                }

                if let (ResourceSlot::Bound(s), ResourceSlot::Bound(o)) =
                    (subject_slot, object_slot)
                {
                    // Fully bound: semi-join, the binding passes through at
                    // most once however many facts confirm it
                    let object_term = Term::Resource(o.clone());
                    if self.fact_holds(rule, s, relation, &object_term)? {
                        out.push(binding.clone());
                    }
                    return Ok(());
                }

                let subject_bound = match subject_slot {
                    ResourceSlot::Bound(iri) => Some(iri),
                    _ => None,
                };
                let object_bound = match object_slot {
                    ResourceSlot::Bound(iri) => Some(Term::Resource(iri.clone())),
                    _ => None,
                };
                for fact in self.facts(rule, subject_bound, Some(relation), object_bound.as_ref())? {
                    // Object relations only ever bind resources
                    let object_iri = match &fact.object {
                        Term::Resource(iri) => iri.clone(),
                        Term::Literal(_) => continue,
                    };
                    let mut next = binding.clone();
                    if let ResourceSlot::Unbound(variable) = subject_slot {
                        if !bind_checked(&mut next, variable, Term::Resource(fact.subject.clone()))
                        {
                            continue;
                        }
                    }
                    if let ResourceSlot::Unbound(variable) = object_slot {
                        if !bind_checked(&mut next, variable, Term::Resource(object_iri)) {
                            continue;
                        }
                    }
                    out.push(next);
                }
                Ok(())
            }
            Atom::DataRelation {
                relation,
                subject,
                value,
            }
            | Atom::AnnotationRelation {
                relation,
                subject,
                value,
            } => {
                let subject_slot = resolve_resource(subject, binding);
                let value_slot = resolve_literal(value, binding);
                if matches!(subject_slot, ResourceSlot::Mismatch)
                    || matches!(value_slot, LiteralSlot::Mismatch)
                {
                    return Ok(());
                }

                if let (ResourceSlot::Bound(s), LiteralSlot::Bound(lit)) =
                    (subject_slot, value_slot)
                {
                    let object_term = Term::Literal(lit.clone());
                    if self.fact_holds(rule, s, relation, &object_term)? {
                        out.push(binding.clone());
                    }
                    return Ok(());
                }

                let subject_bound = match subject_slot {
                    ResourceSlot::Bound(iri) => Some(iri),
                    _ => None,
                };
                let value_bound = match value_slot {
                    LiteralSlot::Bound(lit) => Some(Term::Literal(lit.clone())),
                    _ => None,
                };
                for fact in self.facts(rule, subject_bound, Some(relation), value_bound.as_ref())? {
                    // Literal positions only ever bind literals
                    let literal = match &fact.object {
                        Term::Literal(lit) => lit.clone(),
                        Term::Resource(_) => continue,
                    };
                    let mut next = binding.clone();
                    if let ResourceSlot::Unbound(variable) = subject_slot {
                        if !bind_checked(&mut next, variable, Term::Resource(fact.subject.clone()))
                        {
                            continue;
                        }
                    }
                    if let LiteralSlot::Unbound(variable) = value_slot {
                        if !bind_checked(&mut next, variable, Term::Literal(literal)) {
                            continue;
                        }
                    }
                    out.push(next);
                }
                Ok(())
            }
        }
    }

    fn facts(
        &self,
        rule: &Rule,
        subject: Option<&Iri>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Result<Vec<Assertion>, EvaluationError> {
        self.store
            .matching(subject, predicate, object)
            .map_err(|source| EvaluationError::Store {
                rule: rule.name().to_string(),
                source,
            })
    }

    fn fact_holds(
        &self,
        rule: &Rule,
        subject: &Iri,
        predicate: &Iri,
        object: &Term,
    ) -> Result<bool, EvaluationError> {
        self.store
            .contains(subject, predicate, object)
            .map_err(|source| EvaluationError::Store {
                rule: rule.name().to_string(),
                source,
            })
    }

    fn class_contains(
        &self,
        rule: &Rule,
        class: &Iri,
        individual: &Iri,
    ) -> Result<bool, EvaluationError> {
        match self.cache.contains(class, individual) {
            Some(found) => Ok(found),
            None => self
                .store
                .has_class_member(class, individual)
                .map_err(|source| EvaluationError::Store {
                    rule: rule.name().to_string(),
                    source,
                }),
        }
    }

    fn class_list(&self, rule: &Rule, class: &Iri) -> Result<Vec<Iri>, EvaluationError> {
        match self.cache.members(class) {
            Some(members) => Ok(members.to_vec()),
            None => self
                .store
                .class_members(class)
                .map_err(|source| EvaluationError::Store {
                    rule: rule.name().to_string(),
                    source,
                }),
        }
    }
}

fn resolve_resource<'b>(arg: &'b ResourceArg, binding: &'b Binding) -> ResourceSlot<'b> {
    match arg {
        ResourceArg::Constant(iri) => ResourceSlot::Bound(iri),
        ResourceArg::Variable(name) => match binding.get(name) {
            None => ResourceSlot::Unbound(name),
            Some(Term::Resource(iri)) => ResourceSlot::Bound(iri),
            Some(Term::Literal(_)) => ResourceSlot::Mismatch,
        },
    }
}

fn resolve_literal<'b>(arg: &'b LiteralArg, binding: &'b Binding) -> LiteralSlot<'b> {
    match arg {
        LiteralArg::Constant(lit) => LiteralSlot::Bound(lit),
        LiteralArg::Variable(name) => match binding.get(name) {
            None => LiteralSlot::Unbound(name),
            Some(Term::Literal(lit)) => LiteralSlot::Bound(lit),
            Some(Term::Resource(_)) => LiteralSlot::Mismatch,
        },
    }
}

/// Bind a variable, or confirm an existing binding agrees. The same
/// variable may occur in both positions of one atom.
fn bind_checked(binding: &mut Binding, variable: &str, term: Term) -> bool {
    match binding.get(variable) {
        Some(existing) => *existing == term,
        None => {
            binding.bind(variable, term);
            true
        }
    }
}

fn instantiate(rule: &Rule, atom: &Atom, binding: &Binding) -> Result<Assertion, EvaluationError> {
    match atom {
        Atom::Class { class, individual } => {
            let individual = resource_value(rule, individual, binding)?;
            Ok(Assertion::class_membership(individual, class.clone()))
        }
        Atom::ObjectRelation {
            relation,
            subject,
            object,
        } => Ok(Assertion::resource(
            resource_value(rule, subject, binding)?,
            relation.clone(),
            resource_value(rule, object, binding)?,
        )),
        Atom::DataRelation {
            relation,
            subject,
            value,
        }
        | Atom::AnnotationRelation {
            relation,
            subject,
            value,
        } => Ok(Assertion::literal(
            resource_value(rule, subject, binding)?,
            relation.clone(),
            literal_value(rule, value, binding)?,
        )),
    }
}

fn resource_value(
    rule: &Rule,
    arg: &ResourceArg,
    binding: &Binding,
) -> Result<Iri, EvaluationError> {
    match arg {
        ResourceArg::Constant(iri) => Ok(iri.clone()),
        ResourceArg::Variable(name) => match binding.get(name) {
            Some(Term::Resource(iri)) => Ok(iri.clone()),
            Some(Term::Literal(_)) => Err(EvaluationError::LiteralInResourcePosition {
                rule: rule.name().to_string(),
                variable: name.clone(),
            }),
            None => Err(EvaluationError::UnboundConsequentVariable {
                rule: rule.name().to_string(),
                variable: name.clone(),
            }),
        },
    }
}

fn literal_value(
    rule: &Rule,
    arg: &LiteralArg,
    binding: &Binding,
) -> Result<Literal, EvaluationError> {
    match arg {
        LiteralArg::Constant(lit) => Ok(lit.clone()),
        LiteralArg::Variable(name) => match binding.get(name) {
            Some(Term::Literal(lit)) => Ok(lit.clone()),
            Some(Term::Resource(_)) => Err(EvaluationError::ResourceInLiteralPosition {
                rule: rule.name().to_string(),
                variable: name.clone(),
            }),
            None => Err(EvaluationError::UnboundConsequentVariable {
                rule: rule.name().to_string(),
                variable: name.clone(),
            }),
        },
    }
}

fn render_issue(rule: &Rule, fact: &Assertion, binding: &Binding) -> Issue {
    let (severity, description, suggestion) = match rule.report() {
        Some(template) => {
            let (description, suggestion) = template.render(binding);
            (template.severity, description, suggestion)
        }
        None => (Severity::Error, rule.name().to_string(), String::new()),
    };
    Issue {
        severity,
        rule: rule.name().to_string(),
        description,
        suggestion,
        subjects: vec![
            Term::Resource(fact.subject.clone()),
            fact.object.clone(),
        ],
    }
}
