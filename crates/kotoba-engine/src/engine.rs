//! Vocabulary engine facade bundling the live store, rule catalogs and
//! hierarchy closure materialization

use crate::orchestration::{EngineError, RuleOrchestrator, RunOptions};
use crate::report::ValidationReport;
use kotoba_core::model::Assertion;
use kotoba_hierarchy::{relation_closure, RelationSpec};
use kotoba_rules::model::{Inference, Rule, RuleError, RuleSet};
use kotoba_store::store::MemoryStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub enable_inference: bool,
    pub enable_validation: bool,
    pub parallel: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            enable_inference: true,
            enable_validation: true,
            parallel: true,
        }
    }
}

/// Outcome of a full [`VocabularyEngine::process`] pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineOutcome {
    pub inferences: Vec<Inference>,
    pub report: ValidationReport,
}

/// 推論と検証をひとつのストア上で統合するエンジン
///
/// Rules are evaluated against an immutable snapshot of the live store;
/// inferred facts are written back between passes.
pub struct VocabularyEngine {
    store: Arc<RwLock<MemoryStore>>,
    reasoners: RuleSet,
    validators: RuleSet,
    hierarchies: Vec<RelationSpec>,
    options: EngineOptions,
}

impl VocabularyEngine {
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
            reasoners: RuleSet::new(),
            validators: RuleSet::new(),
            hierarchies: Vec::new(),
            options,
        }
    }

    /// Register an inference rule
    pub fn register_reasoner(&mut self, rule: Rule) -> Result<(), RuleError> {
        self.reasoners.register(rule)
    }

    /// Register a validation rule
    pub fn register_validator(&mut self, rule: Rule) -> Result<(), RuleError> {
        self.validators.register(rule)
    }

    /// Merge a whole reasoner catalog
    pub fn register_reasoners(&mut self, rules: RuleSet) -> Result<(), RuleError> {
        self.reasoners.merge(rules)
    }

    /// Merge a whole validator catalog
    pub fn register_validators(&mut self, rules: RuleSet) -> Result<(), RuleError> {
        self.validators.merge(rules)
    }

    /// Register a hierarchy relation whose transitive closure is
    /// materialized by [`VocabularyEngine::infer`]
    pub fn register_hierarchy(&mut self, spec: RelationSpec) {
        self.hierarchies.push(spec);
    }

    /// Insert one assertion into the live store
    pub async fn insert(&self, assertion: Assertion) -> bool {
        self.store.write().await.insert(assertion)
    }

    /// Load many assertions, returning how many were new
    pub async fn load<I: IntoIterator<Item = Assertion>>(&self, assertions: I) -> usize {
        self.store.write().await.extend(assertions)
    }

    /// Shared handle to the live store
    pub fn store(&self) -> Arc<RwLock<MemoryStore>> {
        Arc::clone(&self.store)
    }

    /// Clear the live store
    pub async fn reset(&self) {
        self.store.write().await.clear();
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Run the reasoner rules over a snapshot, write the inferred facts
    /// back, then materialize the hierarchy closures over the enriched
    /// store. Closure facts already asserted are not reported again.
    pub async fn infer(&self) -> Result<Vec<Inference>, EngineError> {
        info!("Starting inference pass");
        let mut inferences = Vec::new();

        if !self.reasoners.is_empty() {
            let snapshot = Arc::new(self.snapshot().await);
            let run = self.orchestrator().run_all(snapshot, &self.reasoners).await?;
            let mut store = self.store.write().await;
            for inference in &run.inferences {
                store.insert(inference.fact.clone());
            }
            drop(store);
            inferences.extend(run.inferences);
        }

        if !self.hierarchies.is_empty() {
            let snapshot = self.snapshot().await;
            let mut store = self.store.write().await;
            for spec in &self.hierarchies {
                let entailed = match spec.entailed.as_ref() {
                    Some(iri) => iri,
                    None => continue,
                };
                let rule_name = format!("closure:{}", entailed);
                for fact in relation_closure(&snapshot, spec)? {
                    if store.insert(fact.clone()) {
                        inferences.push(Inference {
                            rule: rule_name.clone(),
                            fact,
                        });
                    }
                }
            }
        }

        info!("Inference pass complete: {} facts", inferences.len());
        Ok(inferences)
    }

    /// Run the validator rules over a snapshot
    pub async fn validate(&self) -> Result<ValidationReport, EngineError> {
        info!("Starting validation pass");
        let snapshot = Arc::new(self.snapshot().await);
        let run = self.orchestrator().run_all(snapshot, &self.validators).await?;
        let report = ValidationReport::from_run(&run);
        info!("Validation pass complete: conforms = {}", report.conforms);
        Ok(report)
    }

    /// Inference (when enabled) followed by validation (when enabled)
    pub async fn process(&self) -> Result<EngineOutcome, EngineError> {
        let inferences = if self.options.enable_inference {
            self.infer().await?
        } else {
            Vec::new()
        };

        let report = if self.options.enable_validation {
            self.validate().await?
        } else {
            ValidationReport::conforming()
        };

        Ok(EngineOutcome { inferences, report })
    }

    fn orchestrator(&self) -> RuleOrchestrator {
        RuleOrchestrator::with_options(RunOptions {
            parallel: self.options.parallel,
        })
    }

    async fn snapshot(&self) -> MemoryStore {
        self.store.read().await.clone()
    }
}

impl Default for VocabularyEngine {
    fn default() -> Self {
        Self::new()
    }
}
