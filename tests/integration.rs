// Integration tests for Kotoba components
// These tests verify end-to-end functionality across multiple crates

use kotoba_core::model::{Assertion, Iri, Literal, Term};
use kotoba_core::vocabulary;
use kotoba_domain_skos::{hierarchy_relations, reasoner_rules, validator_rules};
use kotoba_engine::{EngineOptions, RuleOrchestrator, VocabularyEngine};
use kotoba_hierarchy::{flatten, is_collection};
use kotoba_store::store::{FactSource, MemoryStore};
use std::sync::Arc;

fn iri(local: &str) -> Iri {
    Iri::new(format!("http://example.org/{}", local))
}

fn typed(subject: &str, class: Iri) -> Assertion {
    Assertion::class_membership(iri(subject), class)
}

fn related(subject: &str, predicate: Iri, object: &str) -> Assertion {
    Assertion::resource(iri(subject), predicate, iri(object))
}

/// A small, internally consistent food thesaurus
fn clean_thesaurus() -> Vec<Assertion> {
    vec![
        typed("scheme", vocabulary::skos_concept_scheme()),
        typed("food", vocabulary::skos_concept()),
        typed("fruit", vocabulary::skos_concept()),
        typed("vegetable", vocabulary::skos_concept()),
        typed("apple", vocabulary::skos_concept()),
        typed("cox", vocabulary::skos_concept()),
        related("food", vocabulary::skos_top_concept_of(), "scheme"),
        related("fruit", vocabulary::skos_broader(), "food"),
        related("vegetable", vocabulary::skos_broader(), "food"),
        related("apple", vocabulary::skos_broader(), "fruit"),
        related("cox", vocabulary::skos_broader(), "apple"),
        Assertion::literal(
            iri("apple"),
            vocabulary::skos_pref_label(),
            Literal::with_language("Apple", "en"),
        ),
        Assertion::literal(
            iri("apple"),
            vocabulary::skos_pref_label(),
            Literal::with_language("Pomme", "fr"),
        ),
        typed("orchard-fruit", vocabulary::skos_collection()),
        related("orchard-fruit", vocabulary::skos_member(), "apple"),
        related("orchard-fruit", vocabulary::skos_member(), "cox"),
    ]
}

fn stock_engine(parallel: bool) -> VocabularyEngine {
    let mut engine = VocabularyEngine::with_options(EngineOptions {
        parallel,
        ..EngineOptions::default()
    });
    engine.register_reasoners(reasoner_rules().unwrap()).unwrap();
    engine
        .register_validators(validator_rules().unwrap())
        .unwrap();
    for spec in hierarchy_relations() {
        engine.register_hierarchy(spec);
    }
    engine
}

#[tokio::test]
async fn test_clean_thesaurus_conforms_after_inference() {
    let engine = stock_engine(true);
    engine.load(clean_thesaurus()).await;

    let outcome = engine.process().await.unwrap();

    assert!(outcome.report.conforms, "clean data must not raise issues");
    assert!(!outcome.inferences.is_empty());

    let store = engine.store();
    let store = store.read().await;
    // Inverse of the asserted broader edge
    assert!(store
        .contains(
            &iri("fruit"),
            &vocabulary::skos_narrower(),
            &Term::Resource(iri("apple")),
        )
        .unwrap());
    // Implication chain from the asserted top concept
    assert!(store
        .contains(
            &iri("food"),
            &vocabulary::skos_in_scheme(),
            &Term::Resource(iri("scheme")),
        )
        .unwrap());
    // Materialized transitive closure spans the whole broader chain
    assert!(store
        .contains(
            &iri("cox"),
            &vocabulary::skos_broader_transitive(),
            &Term::Resource(iri("food")),
        )
        .unwrap());
    // And the narrower closure runs the other way
    assert!(store
        .contains(
            &iri("food"),
            &vocabulary::skos_narrower_transitive(),
            &Term::Resource(iri("cox")),
        )
        .unwrap());
}

#[tokio::test]
async fn test_contradiction_detected_end_to_end() {
    let engine = stock_engine(true);
    engine.load(clean_thesaurus()).await;
    engine
        .insert(related("fruit", vocabulary::skos_broader(), "vegetable"))
        .await;
    engine
        .insert(related("fruit", vocabulary::skos_narrower(), "vegetable"))
        .await;

    let outcome = engine.process().await.unwrap();

    assert!(!outcome.report.conforms);
    // Inference materializes the mirror pair, so the clash is reported
    // once per direction
    let clash_issues: Vec<_> = outcome
        .report
        .issues
        .iter()
        .filter(|issue| issue.rule == "broader-narrower-clash")
        .collect();
    assert_eq!(clash_issues.len(), 2);
    assert_eq!(outcome.report.error_count(), 2);
}

#[tokio::test]
async fn test_parallel_matches_sequential_end_to_end() {
    let parallel = stock_engine(true);
    let sequential = stock_engine(false);
    for engine in [&parallel, &sequential] {
        engine.load(clean_thesaurus()).await;
        engine
            .insert(related("fruit", vocabulary::skos_broader(), "vegetable"))
            .await;
        engine
            .insert(related("fruit", vocabulary::skos_narrower(), "vegetable"))
            .await;
    }

    let parallel_outcome = parallel.process().await.unwrap();
    let sequential_outcome = sequential.process().await.unwrap();

    assert_eq!(parallel_outcome.inferences, sequential_outcome.inferences);
    assert_eq!(
        parallel_outcome.report.issues,
        sequential_outcome.report.issues
    );
}

#[tokio::test]
async fn test_orchestrated_runs_are_stamped() {
    let mut store = MemoryStore::new();
    for assertion in clean_thesaurus() {
        store.insert(assertion);
    }
    let snapshot = Arc::new(store);
    let rules = reasoner_rules().unwrap();
    let orchestrator = RuleOrchestrator::new();

    let first = orchestrator
        .run_all(Arc::clone(&snapshot), &rules)
        .await
        .unwrap();
    let second = orchestrator.run_all(snapshot, &rules).await.unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert!(first.started_at <= second.started_at);
    assert!(first.started_at <= chrono::Utc::now());
    assert_eq!(first.stats.inference_count, first.inferences.len());
    assert_eq!(first.inferences, second.inferences);
}

#[tokio::test]
async fn test_collection_flattening_over_live_store() {
    let engine = stock_engine(true);
    engine.load(clean_thesaurus()).await;
    engine
        .insert(typed("produce", vocabulary::skos_collection()))
        .await;
    engine
        .insert(related("produce", vocabulary::skos_member(), "vegetable"))
        .await;
    engine
        .insert(related(
            "produce",
            vocabulary::skos_member(),
            "orchard-fruit",
        ))
        .await;

    let store = engine.store();
    let store = store.read().await;

    assert!(is_collection(&*store, &iri("produce")).unwrap());
    assert!(!is_collection(&*store, &iri("apple")).unwrap());

    // Nested collections flatten depth-first in declared order
    let members = flatten(&*store, &iri("produce")).unwrap();
    assert_eq!(members, vec![iri("vegetable"), iri("apple"), iri("cox")]);
}
