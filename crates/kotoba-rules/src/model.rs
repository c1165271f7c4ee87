//! Rule model: atoms, builtins, report templates and rule sets

use kotoba_core::model::{Assertion, Iri, Literal, Term};
use kotoba_core::vocabulary;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while constructing rules and rule sets
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Rule name must not be empty")]
    EmptyName,

    #[error("Rule '{rule}' has an empty antecedent")]
    EmptyAntecedent { rule: String },

    #[error("Rule '{rule}' uses variable '?{variable}' that no antecedent atom binds")]
    UnsafeVariable { rule: String, variable: String },

    #[error("Rule set already contains a rule named '{0}'")]
    DuplicateRule(String),

    #[error("Unknown rule '{0}'")]
    UnknownRule(String),
}

/// Argument in a resource position: a variable or a constant IRI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceArg {
    Variable(String),
    Constant(Iri),
}

impl ResourceArg {
    pub fn var<S: Into<String>>(name: S) -> Self {
        ResourceArg::Variable(name.into())
    }

    pub fn iri<I: Into<Iri>>(iri: I) -> Self {
        ResourceArg::Constant(iri.into())
    }

    pub fn variable(&self) -> Option<&str> {
        match self {
            ResourceArg::Variable(name) => Some(name),
            ResourceArg::Constant(_) => None,
        }
    }
}

/// Argument in a literal position: a variable or a constant literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralArg {
    Variable(String),
    Constant(Literal),
}

impl LiteralArg {
    pub fn var<S: Into<String>>(name: S) -> Self {
        LiteralArg::Variable(name.into())
    }

    pub fn value(literal: Literal) -> Self {
        LiteralArg::Constant(literal)
    }

    pub fn variable(&self) -> Option<&str> {
        match self {
            LiteralArg::Variable(name) => Some(name),
            LiteralArg::Constant(_) => None,
        }
    }
}

/// One antecedent or consequent pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Atom {
    /// `individual rdf:type class`
    Class { class: Iri, individual: ResourceArg },
    /// Resource-valued relation between two resources
    ObjectRelation {
        relation: Iri,
        subject: ResourceArg,
        object: ResourceArg,
    },
    /// Literal-valued data relation
    DataRelation {
        relation: Iri,
        subject: ResourceArg,
        value: LiteralArg,
    },
    /// Literal-valued annotation relation (labels, notes)
    AnnotationRelation {
        relation: Iri,
        subject: ResourceArg,
        value: LiteralArg,
    },
}

impl Atom {
    pub fn class(class: Iri, individual: ResourceArg) -> Self {
        Atom::Class { class, individual }
    }

    pub fn object_relation(relation: Iri, subject: ResourceArg, object: ResourceArg) -> Self {
        Atom::ObjectRelation {
            relation,
            subject,
            object,
        }
    }

    pub fn data_relation(relation: Iri, subject: ResourceArg, value: LiteralArg) -> Self {
        Atom::DataRelation {
            relation,
            subject,
            value,
        }
    }

    pub fn annotation_relation(relation: Iri, subject: ResourceArg, value: LiteralArg) -> Self {
        Atom::AnnotationRelation {
            relation,
            subject,
            value,
        }
    }

    /// Variables this atom mentions
    pub fn variables(&self) -> Vec<&str> {
        let mut vars = Vec::new();
        match self {
            Atom::Class { individual, .. } => {
                if let Some(name) = individual.variable() {
                    vars.push(name);
                }
            }
            Atom::ObjectRelation {
                subject, object, ..
            } => {
                if let Some(name) = subject.variable() {
                    vars.push(name);
                }
                if let Some(name) = object.variable() {
                    vars.push(name);
                }
            }
            Atom::DataRelation { subject, value, .. }
            | Atom::AnnotationRelation { subject, value, .. } => {
                if let Some(name) = subject.variable() {
                    vars.push(name);
                }
                if let Some(name) = value.variable() {
                    vars.push(name);
                }
            }
        }
        vars
    }

    /// True when this atom reports through the violation marker predicate
    pub fn is_violation_marker(&self) -> bool {
        match self {
            Atom::Class { .. } => false,
            Atom::ObjectRelation { relation, .. }
            | Atom::DataRelation { relation, .. }
            | Atom::AnnotationRelation { relation, .. } => {
                relation.as_str() == vocabulary::VIOLATION
            }
        }
    }
}

/// Filter predicates applied once the antecedent join is complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BuiltIn {
    /// Bound terms are structurally equal
    Equal { left: String, right: String },
    /// Bound terms differ
    NotEqual { left: String, right: String },
    /// Both terms are literals carrying the same language tag
    LanguageTagMatches { left: String, right: String },
}

impl BuiltIn {
    pub fn equal<L: Into<String>, R: Into<String>>(left: L, right: R) -> Self {
        BuiltIn::Equal {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn not_equal<L: Into<String>, R: Into<String>>(left: L, right: R) -> Self {
        BuiltIn::NotEqual {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn language_tag_matches<L: Into<String>, R: Into<String>>(left: L, right: R) -> Self {
        BuiltIn::LanguageTagMatches {
            left: left.into(),
            right: right.into(),
        }
    }

    /// The two variables this builtin compares
    pub fn variables(&self) -> [&str; 2] {
        match self {
            BuiltIn::Equal { left, right }
            | BuiltIn::NotEqual { left, right }
            | BuiltIn::LanguageTagMatches { left, right } => [left, right],
        }
    }

    /// Evaluate against a binding. Rules that passed safety validation
    /// always reach this with both variables bound.
    pub fn holds(&self, binding: &Binding) -> bool {
        let [left, right] = self.variables();
        let (lhs, rhs) = match (binding.get(left), binding.get(right)) {
            (Some(lhs), Some(rhs)) => (lhs, rhs),
            _ => return false,
        };
        match self {
            BuiltIn::Equal { .. } => lhs == rhs,
            BuiltIn::NotEqual { .. } => lhs != rhs,
            BuiltIn::LanguageTagMatches { .. } => match (lhs, rhs) {
                (Term::Literal(a), Term::Literal(b)) => a.same_language(b),
                _ => false,
            },
        }
    }
}

/// Issue severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// Report texts attached to a validation rule.
///
/// `{var}` placeholders are substituted with the bound term's display
/// form; unknown placeholders are left verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTemplate {
    pub severity: Severity,
    pub description: String,
    pub suggestion: String,
}

impl ReportTemplate {
    pub fn new<D: Into<String>, S: Into<String>>(
        severity: Severity,
        description: D,
        suggestion: S,
    ) -> Self {
        Self {
            severity,
            description: description.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Render description and suggestion against a binding
    pub fn render(&self, binding: &Binding) -> (String, String) {
        (
            substitute(&self.description, binding),
            substitute(&self.suggestion, binding),
        )
    }
}

fn substitute(template: &str, binding: &Binding) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match binding.get(name) {
                    Some(term) => out.push_str(&term.to_string()),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// One consistent assignment of variables to terms.
///
/// Backed by a `BTreeMap` so iteration and hashing are stable, which makes
/// deduplication on the full assignment tuple well defined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    values: BTreeMap<String, Term>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.values.get(variable)
    }

    pub fn bind<S: Into<String>>(&mut self, variable: S, term: Term) {
        self.values.insert(variable.into(), term);
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.values.contains_key(variable)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Term)> {
        self.values.iter()
    }
}

/// A fact produced by a rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inference {
    /// Name of the rule that produced the fact
    pub rule: String,
    pub fact: Assertion,
}

/// A reported violation. This is a data outcome, not an engine failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    /// Name of the rule that detected the violation
    pub rule: String,
    pub description: String,
    pub suggestion: String,
    /// Terms the violation is about, in consequent order
    pub subjects: Vec<Term>,
}

/// A declarative rule.
///
/// Antecedent atoms are joined in declaration order, builtins filter the
/// resulting bindings, and consequent atoms are instantiated once per
/// surviving binding. Safety is checked at construction: every variable a
/// builtin or consequent atom uses must be bound by some antecedent atom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    name: String,
    antecedent: Vec<Atom>,
    builtins: Vec<BuiltIn>,
    consequent: Vec<Atom>,
    report: Option<ReportTemplate>,
}

impl Rule {
    pub fn new<S: Into<String>>(
        name: S,
        antecedent: Vec<Atom>,
        builtins: Vec<BuiltIn>,
        consequent: Vec<Atom>,
    ) -> Result<Self, RuleError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RuleError::EmptyName);
        }
        if antecedent.is_empty() {
            return Err(RuleError::EmptyAntecedent { rule: name });
        }

        let mut bound: HashSet<&str> = HashSet::new();
        for atom in &antecedent {
            bound.extend(atom.variables());
        }
        for builtin in &builtins {
            for variable in builtin.variables() {
                if !bound.contains(variable) {
                    return Err(RuleError::UnsafeVariable {
                        rule: name.clone(),
                        variable: variable.to_string(),
                    });
                }
            }
        }
        for atom in &consequent {
            for variable in atom.variables() {
                if !bound.contains(variable) {
                    return Err(RuleError::UnsafeVariable {
                        rule: name.clone(),
                        variable: variable.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            name,
            antecedent,
            builtins,
            consequent,
            report: None,
        })
    }

    /// Attach report texts for violation consequents
    pub fn with_report(mut self, report: ReportTemplate) -> Self {
        self.report = Some(report);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn antecedent(&self) -> &[Atom] {
        &self.antecedent
    }

    pub fn builtins(&self) -> &[BuiltIn] {
        &self.builtins
    }

    pub fn consequent(&self) -> &[Atom] {
        &self.consequent
    }

    pub fn report(&self) -> Option<&ReportTemplate> {
        self.report.as_ref()
    }

    /// True when any consequent atom reports through the violation marker
    pub fn is_validator(&self) -> bool {
        self.consequent.iter().any(|atom| atom.is_violation_marker())
    }

    /// Classes referenced by `Class` atoms anywhere in the rule
    pub fn referenced_classes(&self) -> Vec<&Iri> {
        self.antecedent
            .iter()
            .chain(self.consequent.iter())
            .filter_map(|atom| match atom {
                Atom::Class { class, .. } => Some(class),
                _ => None,
            })
            .collect()
    }
}

/// Insertion-ordered, name-indexed rule collection.
///
/// Rules are stored behind `Arc` so catalogs can be built once and shared
/// across runs and worker tasks.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Arc<Rule>>,
    by_name: HashMap<String, usize>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule. Names are unique within a set.
    pub fn register(&mut self, rule: Rule) -> Result<(), RuleError> {
        self.register_shared(Arc::new(rule))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Rule>> {
        self.by_name.get(name).map(|&idx| &self.rules[idx])
    }

    /// Resolve a list of rule names, preserving the requested order
    pub fn select(&self, names: &[&str]) -> Result<Vec<Arc<Rule>>, RuleError> {
        names
            .iter()
            .map(|name| {
                self.get(name)
                    .cloned()
                    .ok_or_else(|| RuleError::UnknownRule(name.to_string()))
            })
            .collect()
    }

    /// All rules in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Move all rules from `other` into this set
    pub fn merge(&mut self, other: RuleSet) -> Result<(), RuleError> {
        for rule in other.rules {
            self.register_shared(rule)?;
        }
        Ok(())
    }

    fn register_shared(&mut self, rule: Arc<Rule>) -> Result<(), RuleError> {
        if self.by_name.contains_key(rule.name()) {
            return Err(RuleError::DuplicateRule(rule.name().to_string()));
        }
        self.by_name.insert(rule.name().to_string(), self.rules.len());
        self.rules.push(rule);
        Ok(())
    }
}
