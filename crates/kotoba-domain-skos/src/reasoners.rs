//! SKOS entailment rules
//!
//! 逆関係・対称関係・含意の三つのテンプレートから推論ルールを構成する。
//! 推移閉包そのものはルールではなく kotoba-hierarchy の探索で実体化する。

use kotoba_core::model::Iri;
use kotoba_core::vocabulary;
use kotoba_hierarchy::RelationSpec;
use kotoba_rules::model::{Atom, ResourceArg, Rule, RuleError, RuleSet};

/// `from(?A,?B) → to(?B,?A)`
pub fn inverse_rule(name: &str, from: Iri, to: Iri) -> Result<Rule, RuleError> {
    Rule::new(
        name,
        vec![Atom::object_relation(
            from,
            ResourceArg::var("A"),
            ResourceArg::var("B"),
        )],
        vec![],
        vec![Atom::object_relation(
            to,
            ResourceArg::var("B"),
            ResourceArg::var("A"),
        )],
    )
}

/// `relation(?A,?B) → relation(?B,?A)`
pub fn symmetric_rule(name: &str, relation: Iri) -> Result<Rule, RuleError> {
    inverse_rule(name, relation.clone(), relation)
}

/// `from(?A,?B) → to(?A,?B)`
pub fn implication_rule(name: &str, from: Iri, to: Iri) -> Result<Rule, RuleError> {
    Rule::new(
        name,
        vec![Atom::object_relation(
            from,
            ResourceArg::var("A"),
            ResourceArg::var("B"),
        )],
        vec![],
        vec![Atom::object_relation(
            to,
            ResourceArg::var("A"),
            ResourceArg::var("B"),
        )],
    )
}

/// Full reasoner catalog, built once and reused across runs
pub fn reasoner_rules() -> Result<RuleSet, RuleError> {
    let mut rules = RuleSet::new();

    // Inverse pairs
    rules.register(inverse_rule(
        "narrower-from-broader",
        vocabulary::skos_broader(),
        vocabulary::skos_narrower(),
    )?)?;
    rules.register(inverse_rule(
        "broader-from-narrower",
        vocabulary::skos_narrower(),
        vocabulary::skos_broader(),
    )?)?;
    rules.register(inverse_rule(
        "narrow-match-from-broad-match",
        vocabulary::skos_broad_match(),
        vocabulary::skos_narrow_match(),
    )?)?;
    rules.register(inverse_rule(
        "broad-match-from-narrow-match",
        vocabulary::skos_narrow_match(),
        vocabulary::skos_broad_match(),
    )?)?;
    rules.register(inverse_rule(
        "top-concept-of-from-has-top-concept",
        vocabulary::skos_has_top_concept(),
        vocabulary::skos_top_concept_of(),
    )?)?;
    rules.register(inverse_rule(
        "has-top-concept-from-top-concept-of",
        vocabulary::skos_top_concept_of(),
        vocabulary::skos_has_top_concept(),
    )?)?;

    // Symmetric relations
    rules.register(symmetric_rule("related-symmetry", vocabulary::skos_related())?)?;
    rules.register(symmetric_rule(
        "related-match-symmetry",
        vocabulary::skos_related_match(),
    )?)?;
    rules.register(symmetric_rule(
        "exact-match-symmetry",
        vocabulary::skos_exact_match(),
    )?)?;
    rules.register(symmetric_rule(
        "close-match-symmetry",
        vocabulary::skos_close_match(),
    )?)?;

    // Implications
    rules.register(implication_rule(
        "in-scheme-from-top-concept-of",
        vocabulary::skos_top_concept_of(),
        vocabulary::skos_in_scheme(),
    )?)?;
    rules.register(implication_rule(
        "broader-from-broad-match",
        vocabulary::skos_broad_match(),
        vocabulary::skos_broader(),
    )?)?;
    rules.register(implication_rule(
        "broader-transitive-step",
        vocabulary::skos_broader(),
        vocabulary::skos_broader_transitive(),
    )?)?;
    rules.register(implication_rule(
        "narrower-transitive-step",
        vocabulary::skos_narrower(),
        vocabulary::skos_narrower_transitive(),
    )?)?;

    Ok(rules)
}

/// Hierarchy relations whose transitive closure the engine materializes
pub fn hierarchy_relations() -> Vec<RelationSpec> {
    vec![
        RelationSpec::transitive(
            vocabulary::skos_broader(),
            vocabulary::skos_broader_transitive(),
        ),
        RelationSpec::transitive(
            vocabulary::skos_narrower(),
            vocabulary::skos_narrower_transitive(),
        ),
        RelationSpec::symmetric(vocabulary::skos_exact_match()),
    ]
}
