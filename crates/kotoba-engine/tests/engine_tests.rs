//! Tests for the kotoba-engine crate

use kotoba_core::model::{Assertion, Iri, Term};
use kotoba_core::vocabulary;
use kotoba_engine::*;
use kotoba_hierarchy::RelationSpec;
use kotoba_rules::model::{
    Atom, BuiltIn, ReportTemplate, ResourceArg, Rule, RuleError, RuleSet, Severity,
};
use kotoba_store::store::{FactSource, MemoryStore, StoreError};
use std::sync::Arc;

fn iri(local: &str) -> Iri {
    Iri::new(format!("http://example.org/{}", local))
}

fn concept(store: &mut MemoryStore, name: &str) {
    store.insert(Assertion::class_membership(
        iri(name),
        vocabulary::skos_concept(),
    ));
}

fn clash_rule() -> Rule {
    Rule::new(
        "broader-narrower-clash",
        vec![
            Atom::class(vocabulary::skos_concept(), ResourceArg::var("a")),
            Atom::class(vocabulary::skos_concept(), ResourceArg::var("b")),
            Atom::object_relation(
                vocabulary::skos_broader(),
                ResourceArg::var("a"),
                ResourceArg::var("b"),
            ),
            Atom::object_relation(
                vocabulary::skos_narrower(),
                ResourceArg::var("a"),
                ResourceArg::var("b"),
            ),
        ],
        vec![BuiltIn::not_equal("a", "b")],
        vec![Atom::object_relation(
            vocabulary::violation(),
            ResourceArg::var("a"),
            ResourceArg::var("b"),
        )],
    )
    .unwrap()
    .with_report(ReportTemplate::new(
        Severity::Error,
        "{a} is both broader and narrower than {b}",
        "Remove one of the two relations",
    ))
}

fn related_symmetry_rule() -> Rule {
    Rule::new(
        "related-symmetry",
        vec![Atom::object_relation(
            vocabulary::skos_related(),
            ResourceArg::var("a"),
            ResourceArg::var("b"),
        )],
        vec![],
        vec![Atom::object_relation(
            vocabulary::skos_related(),
            ResourceArg::var("b"),
            ResourceArg::var("a"),
        )],
    )
    .unwrap()
}

fn mixed_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    concept(&mut store, "animals");
    concept(&mut store, "mammals");
    concept(&mut store, "fish");
    store.insert(Assertion::resource(
        iri("mammals"),
        vocabulary::skos_broader(),
        iri("animals"),
    ));
    store.insert(Assertion::resource(
        iri("mammals"),
        vocabulary::skos_narrower(),
        iri("animals"),
    ));
    store.insert(Assertion::resource(
        iri("mammals"),
        vocabulary::skos_related(),
        iri("fish"),
    ));
    store
}

fn mixed_rules() -> RuleSet {
    let mut rules = RuleSet::new();
    rules.register(clash_rule()).unwrap();
    rules.register(related_symmetry_rule()).unwrap();
    rules
}

/// Store whose every query fails
struct FailingStore;

impl FactSource for FailingStore {
    fn matching(
        &self,
        _subject: Option<&Iri>,
        _predicate: Option<&Iri>,
        _object: Option<&Term>,
    ) -> Result<Vec<Assertion>, StoreError> {
        Err(StoreError::AccessFailed {
            message: "backend unavailable".to_string(),
        })
    }
}

#[tokio::test]
async fn test_parallel_and_sequential_agree() {
    let store = Arc::new(mixed_store());
    let rules = mixed_rules();

    let parallel = RuleOrchestrator::with_options(RunOptions { parallel: true })
        .run_all(Arc::clone(&store), &rules)
        .await
        .unwrap();
    let sequential = RuleOrchestrator::with_options(RunOptions { parallel: false })
        .run_all(store, &rules)
        .await
        .unwrap();

    assert_eq!(parallel.inferences, sequential.inferences);
    assert_eq!(parallel.issues, sequential.issues);
}

#[tokio::test]
async fn test_repeated_runs_are_deterministic() {
    let store = Arc::new(mixed_store());
    let rules = mixed_rules();
    let orchestrator = RuleOrchestrator::new();

    let first = orchestrator
        .run_all(Arc::clone(&store), &rules)
        .await
        .unwrap();
    let second = orchestrator.run_all(store, &rules).await.unwrap();

    assert_eq!(first.inferences, second.inferences);
    assert_eq!(first.issues, second.issues);
    assert_ne!(first.run_id, second.run_id);
}

#[tokio::test]
async fn test_results_follow_request_order() {
    let store = Arc::new(mixed_store());
    let rules = mixed_rules();
    let orchestrator = RuleOrchestrator::new();

    let clash_first = orchestrator
        .run_named(
            Arc::clone(&store),
            &rules,
            &["broader-narrower-clash", "related-symmetry"],
        )
        .await
        .unwrap();
    let symmetry_first = orchestrator
        .run_named(store, &rules, &["related-symmetry", "broader-narrower-clash"])
        .await
        .unwrap();

    assert_eq!(
        clash_first.inferences.first().unwrap().rule,
        "broader-narrower-clash"
    );
    assert_eq!(
        symmetry_first.inferences.first().unwrap().rule,
        "related-symmetry"
    );
    // Same facts either way, only the order differs
    assert_eq!(clash_first.inferences.len(), symmetry_first.inferences.len());
    assert_eq!(clash_first.issues, symmetry_first.issues);
}

#[tokio::test]
async fn test_unknown_rule_name_fails_fast() {
    let store = Arc::new(mixed_store());
    let rules = mixed_rules();

    let result = RuleOrchestrator::new()
        .run_named(store, &rules, &["no-such-rule"])
        .await;

    assert!(matches!(
        result,
        Err(EngineError::Rules(RuleError::UnknownRule(name))) if name == "no-such-rule"
    ));
}

#[tokio::test]
async fn test_cancelled_token_aborts_run() {
    let store = Arc::new(mixed_store());
    let rules = mixed_rules();
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = RuleOrchestrator::new()
        .run_named_with_cancel(
            store,
            &rules,
            &["broader-narrower-clash", "related-symmetry"],
            cancel,
        )
        .await;

    assert!(matches!(result, Err(EngineError::Cancelled)));
}

#[tokio::test]
async fn test_store_failure_aborts_run() {
    let store = Arc::new(FailingStore);
    let rules = mixed_rules();

    let result = RuleOrchestrator::new().run_all(store, &rules).await;

    assert!(matches!(result, Err(EngineError::Evaluation(_))));
}

#[tokio::test]
async fn test_run_stats() {
    let store = Arc::new(mixed_store());
    let rules = mixed_rules();

    let report = RuleOrchestrator::new().run_all(store, &rules).await.unwrap();

    assert_eq!(report.stats.rules_evaluated, 2);
    assert_eq!(report.stats.inference_count, report.inferences.len());
    assert_eq!(report.stats.issue_count, report.issues.len());
}

#[tokio::test]
async fn test_engine_infer_writes_back() {
    let mut engine = VocabularyEngine::new();
    engine.register_reasoner(related_symmetry_rule()).unwrap();
    engine
        .insert(Assertion::resource(
            iri("a"),
            vocabulary::skos_related(),
            iri("b"),
        ))
        .await;

    let inferences = engine.infer().await.unwrap();

    assert_eq!(inferences.len(), 1);
    let store = engine.store();
    let store = store.read().await;
    assert!(store
        .contains(
            &iri("b"),
            &vocabulary::skos_related(),
            &Term::Resource(iri("a")),
        )
        .unwrap());
}

#[tokio::test]
async fn test_engine_infer_materializes_closure() {
    let mut engine = VocabularyEngine::new();
    engine.register_hierarchy(RelationSpec::transitive(
        vocabulary::skos_broader(),
        vocabulary::skos_broader_transitive(),
    ));
    engine
        .load([
            Assertion::resource(iri("a"), vocabulary::skos_broader(), iri("b")),
            Assertion::resource(iri("b"), vocabulary::skos_broader(), iri("c")),
        ])
        .await;

    let inferences = engine.infer().await.unwrap();

    let closure_name = format!("closure:{}", vocabulary::skos_broader_transitive());
    assert!(inferences.iter().all(|inference| inference.rule == closure_name));
    let store = engine.store();
    let store = store.read().await;
    assert!(store
        .contains(
            &iri("a"),
            &vocabulary::skos_broader_transitive(),
            &Term::Resource(iri("c")),
        )
        .unwrap());

    // A second pass finds nothing new
    drop(store);
    let again = engine.infer().await.unwrap();
    assert!(again.is_empty());
}

#[tokio::test]
async fn test_engine_process_reports_issues() {
    let mut engine = VocabularyEngine::new();
    engine.register_validator(clash_rule()).unwrap();
    engine.load(mixed_store().assertions().to_vec()).await;

    let outcome = engine.process().await.unwrap();

    assert!(!outcome.report.conforms);
    assert_eq!(outcome.report.error_count(), 1);
    assert_eq!(outcome.report.warning_count(), 0);
    let issue = &outcome.report.issues[0];
    assert_eq!(issue.rule, "broader-narrower-clash");
    assert!(issue.description.contains("mammals"));
    assert!(issue.description.contains("animals"));
}

#[tokio::test]
async fn test_engine_disabled_validation_conforms() {
    let mut engine = VocabularyEngine::with_options(EngineOptions {
        enable_validation: false,
        ..EngineOptions::default()
    });
    engine.register_validator(clash_rule()).unwrap();
    engine.load(mixed_store().assertions().to_vec()).await;

    let outcome = engine.process().await.unwrap();

    assert!(outcome.report.conforms);
    assert!(outcome.report.issues.is_empty());
}

#[tokio::test]
async fn test_engine_reset() {
    let engine = VocabularyEngine::new();
    engine
        .insert(Assertion::resource(
            iri("a"),
            vocabulary::skos_related(),
            iri("b"),
        ))
        .await;
    engine.reset().await;

    let store = engine.store();
    assert!(store.read().await.is_empty());
}

#[tokio::test]
async fn test_validation_report_rendering() {
    let mut engine = VocabularyEngine::new();
    engine.register_validator(clash_rule()).unwrap();
    engine.load(mixed_store().assertions().to_vec()).await;

    let report = engine.validate().await.unwrap();
    let rendered = report.to_simple_string();

    assert!(rendered.contains("DOES NOT CONFORM"));
    assert!(rendered.contains("broader-narrower-clash"));
    assert!(rendered.contains("Severity: Error"));

    let json = report.to_json().unwrap();
    assert_eq!(json["conforms"], serde_json::json!(false));
}

#[test]
fn test_default_options() {
    let options = EngineOptions::default();
    assert!(options.enable_inference);
    assert!(options.enable_validation);
    assert!(options.parallel);
    assert!(RunOptions::default().parallel);
}
