//! SKOS integrity validators
//!
//! 排他的な関係ペアはデータとして保持し、単一のテンプレートから
//! ルールを生成する。ラベル規則とクラス排他はその外側で個別に定義。

use kotoba_core::model::Iri;
use kotoba_core::vocabulary;
use kotoba_rules::model::{
    Atom, BuiltIn, LiteralArg, ReportTemplate, ResourceArg, Rule, RuleError, RuleSet, Severity,
};
use serde::{Deserialize, Serialize};

/// One pair of relations that must not both hold between the same two
/// concepts. Feeds [`mutual_exclusion_rule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSpec {
    pub name: String,
    pub first: Iri,
    pub second: Iri,
    pub severity: Severity,
    pub description: String,
    pub suggestion: String,
}

impl ExclusionSpec {
    pub fn new<N, D, S>(
        name: N,
        first: Iri,
        second: Iri,
        severity: Severity,
        description: D,
        suggestion: S,
    ) -> Self
    where
        N: Into<String>,
        D: Into<String>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            first,
            second,
            severity,
            description: description.into(),
            suggestion: suggestion.into(),
        }
    }
}

/// The exclusive relation pairs shipped with the engine
pub fn exclusion_catalog() -> Vec<ExclusionSpec> {
    vec![
        ExclusionSpec::new(
            "broader-narrower-clash",
            vocabulary::skos_broader(),
            vocabulary::skos_narrower(),
            Severity::Error,
            "{C1} is asserted both broader and narrower than {C2}",
            "Keep only one direction of the hierarchy between the two concepts",
        ),
        ExclusionSpec::new(
            "related-broader-clash",
            vocabulary::skos_related(),
            vocabulary::skos_broader(),
            Severity::Error,
            "{C1} is related to {C2} and also broader than it",
            "Associative and hierarchical links are exclusive; remove one",
        ),
        ExclusionSpec::new(
            "related-narrower-clash",
            vocabulary::skos_related(),
            vocabulary::skos_narrower(),
            Severity::Error,
            "{C1} is related to {C2} and also narrower than it",
            "Associative and hierarchical links are exclusive; remove one",
        ),
        ExclusionSpec::new(
            "related-broader-transitive-clash",
            vocabulary::skos_related(),
            vocabulary::skos_broader_transitive(),
            Severity::Error,
            "{C1} is related to {C2}, which lies above it in the hierarchy",
            "Remove the associative link or restructure the hierarchy",
        ),
        ExclusionSpec::new(
            "exact-broad-match-clash",
            vocabulary::skos_exact_match(),
            vocabulary::skos_broad_match(),
            Severity::Error,
            "{C1} is mapped to {C2} as both an exact and a broad match",
            "Downgrade the exact match or drop the broad match",
        ),
        ExclusionSpec::new(
            "exact-narrow-match-clash",
            vocabulary::skos_exact_match(),
            vocabulary::skos_narrow_match(),
            Severity::Error,
            "{C1} is mapped to {C2} as both an exact and a narrow match",
            "Downgrade the exact match or drop the narrow match",
        ),
        ExclusionSpec::new(
            "exact-related-match-clash",
            vocabulary::skos_exact_match(),
            vocabulary::skos_related_match(),
            Severity::Error,
            "{C1} is mapped to {C2} as both an exact and a related match",
            "Downgrade the exact match or drop the related match",
        ),
        ExclusionSpec::new(
            "broad-narrow-match-clash",
            vocabulary::skos_broad_match(),
            vocabulary::skos_narrow_match(),
            Severity::Error,
            "{C1} is mapped to {C2} as both a broad and a narrow match",
            "A concept cannot be broader and narrower than the same target",
        ),
    ]
}

/// Generic mutual-exclusion template over two concept relations:
/// `Concept(?C1) ∧ Concept(?C2) ∧ first(?C1,?C2) ∧ second(?C1,?C2)
/// ∧ NotEqual(?C1,?C2) → violation(?C1,?C2)`
pub fn mutual_exclusion_rule(spec: &ExclusionSpec) -> Result<Rule, RuleError> {
    let rule = Rule::new(
        spec.name.as_str(),
        vec![
            Atom::class(vocabulary::skos_concept(), ResourceArg::var("C1")),
            Atom::class(vocabulary::skos_concept(), ResourceArg::var("C2")),
            Atom::object_relation(
                spec.first.clone(),
                ResourceArg::var("C1"),
                ResourceArg::var("C2"),
            ),
            Atom::object_relation(
                spec.second.clone(),
                ResourceArg::var("C1"),
                ResourceArg::var("C2"),
            ),
        ],
        vec![BuiltIn::not_equal("C1", "C2")],
        vec![Atom::object_relation(
            vocabulary::violation(),
            ResourceArg::var("C1"),
            ResourceArg::var("C2"),
        )],
    )?;
    Ok(rule.with_report(ReportTemplate::new(
        spec.severity,
        spec.description.as_str(),
        spec.suggestion.as_str(),
    )))
}

/// One literal serving under two different label predicates of the same
/// concept
pub fn label_clash_rule(
    name: &str,
    first: Iri,
    second: Iri,
    description: &str,
) -> Result<Rule, RuleError> {
    let rule = Rule::new(
        name,
        vec![
            Atom::class(vocabulary::skos_concept(), ResourceArg::var("C")),
            Atom::annotation_relation(first, ResourceArg::var("C"), LiteralArg::var("L1")),
            Atom::annotation_relation(second, ResourceArg::var("C"), LiteralArg::var("L2")),
        ],
        vec![BuiltIn::equal("L1", "L2")],
        vec![Atom::annotation_relation(
            vocabulary::violation(),
            ResourceArg::var("C"),
            LiteralArg::var("L1"),
        )],
    )?;
    Ok(rule.with_report(ReportTemplate::new(
        Severity::Warning,
        description,
        "Keep the literal under one label predicate only",
    )))
}

/// Two distinct preferred labels sharing a language tag on one concept
pub fn duplicate_pref_label_rule() -> Result<Rule, RuleError> {
    let rule = Rule::new(
        "duplicate-pref-label-language",
        vec![
            Atom::class(vocabulary::skos_concept(), ResourceArg::var("C")),
            Atom::annotation_relation(
                vocabulary::skos_pref_label(),
                ResourceArg::var("C"),
                LiteralArg::var("L1"),
            ),
            Atom::annotation_relation(
                vocabulary::skos_pref_label(),
                ResourceArg::var("C"),
                LiteralArg::var("L2"),
            ),
        ],
        vec![
            BuiltIn::not_equal("L1", "L2"),
            BuiltIn::language_tag_matches("L1", "L2"),
        ],
        vec![Atom::annotation_relation(
            vocabulary::violation(),
            ResourceArg::var("C"),
            LiteralArg::var("L1"),
        )],
    )?;
    Ok(rule.with_report(ReportTemplate::new(
        Severity::Warning,
        "{C} has more than one preferred label in the same language",
        "A concept carries at most one preferred label per language",
    )))
}

/// Membership in two disjoint classes
pub fn class_disjointness_rule(
    name: &str,
    first: Iri,
    second: Iri,
    description: &str,
) -> Result<Rule, RuleError> {
    let rule = Rule::new(
        name,
        vec![
            Atom::class(first, ResourceArg::var("X")),
            Atom::class(second, ResourceArg::var("X")),
        ],
        vec![],
        vec![Atom::object_relation(
            vocabulary::violation(),
            ResourceArg::var("X"),
            ResourceArg::var("X"),
        )],
    )?;
    Ok(rule.with_report(ReportTemplate::new(
        Severity::Error,
        description,
        "Disjoint classes cannot share an individual",
    )))
}

/// Full validator catalog, built once and reused across runs
pub fn validator_rules() -> Result<RuleSet, RuleError> {
    let mut rules = RuleSet::new();
    for spec in exclusion_catalog() {
        rules.register(mutual_exclusion_rule(&spec)?)?;
    }
    rules.register(label_clash_rule(
        "pref-alt-label-clash",
        vocabulary::skos_pref_label(),
        vocabulary::skos_alt_label(),
        "{C} repeats {L1} as both preferred and alternative label",
    )?)?;
    rules.register(label_clash_rule(
        "pref-hidden-label-clash",
        vocabulary::skos_pref_label(),
        vocabulary::skos_hidden_label(),
        "{C} repeats {L1} as both preferred and hidden label",
    )?)?;
    rules.register(label_clash_rule(
        "alt-hidden-label-clash",
        vocabulary::skos_alt_label(),
        vocabulary::skos_hidden_label(),
        "{C} repeats {L1} as both alternative and hidden label",
    )?)?;
    rules.register(duplicate_pref_label_rule()?)?;
    rules.register(class_disjointness_rule(
        "concept-collection-disjoint",
        vocabulary::skos_concept(),
        vocabulary::skos_collection(),
        "{X} is typed as both a concept and a collection",
    )?)?;
    rules.register(class_disjointness_rule(
        "concept-scheme-disjoint",
        vocabulary::skos_concept(),
        vocabulary::skos_concept_scheme(),
        "{X} is typed as both a concept and a concept scheme",
    )?)?;
    Ok(rules)
}
