use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kotoba_core::model::{Assertion, Iri};
use kotoba_core::vocabulary;
use kotoba_rules::{Atom, BuiltIn, ResourceArg, Rule, RuleEvaluator, TypeCache};
use kotoba_store::store::MemoryStore;

fn concept(i: usize) -> Iri {
    Iri::new(format!("http://example.org/Concept{}", i))
}

fn create_test_thesaurus(size: usize) -> MemoryStore {
    let mut store = MemoryStore::new();

    // Chain of concepts: Concept_i broader Concept_{i+1}
    for i in 0..size {
        store.insert(Assertion::class_membership(
            concept(i),
            vocabulary::skos_concept(),
        ));
        if i + 1 < size {
            store.insert(Assertion::resource(
                concept(i),
                vocabulary::skos_broader(),
                concept(i + 1),
            ));
        }
        // Every tenth pair also carries the contradictory relation
        if i % 10 == 0 && i + 1 < size {
            store.insert(Assertion::resource(
                concept(i),
                vocabulary::skos_narrower(),
                concept(i + 1),
            ));
        }
    }

    store
}

// Relation atom first so the class atoms act as semi-join filters instead
// of enumerating the concept cross product
fn clash_rule() -> Rule {
    Rule::new(
        "broader-narrower-clash",
        vec![
            Atom::object_relation(
                vocabulary::skos_broader(),
                ResourceArg::var("C1"),
                ResourceArg::var("C2"),
            ),
            Atom::class(vocabulary::skos_concept(), ResourceArg::var("C1")),
            Atom::class(vocabulary::skos_concept(), ResourceArg::var("C2")),
            Atom::object_relation(
                vocabulary::skos_narrower(),
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
    )
    .unwrap()
}

fn benchmark_rule_evaluation(c: &mut Criterion) {
    let sizes = [100, 500, 1000];

    for &size in &sizes {
        let store = create_test_thesaurus(size);
        let rule = clash_rule();
        let cache = TypeCache::build([&rule], &store).unwrap();

        c.bench_function(&format!("rule_evaluation_{}_concepts", size), |b| {
            b.iter(|| {
                let evaluator = RuleEvaluator::new(black_box(&store), &cache);
                let _outcome = evaluator.evaluate(&rule).unwrap();
            });
        });
    }
}

fn benchmark_type_cache_build(c: &mut Criterion) {
    let store = create_test_thesaurus(1000);
    let rule = clash_rule();

    c.bench_function("type_cache_build_1000_concepts", |b| {
        b.iter(|| {
            let _cache = TypeCache::build([&rule], black_box(&store)).unwrap();
        });
    });
}

criterion_group!(benches, benchmark_rule_evaluation, benchmark_type_cache_build);
criterion_main!(benches);
