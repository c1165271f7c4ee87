//! Rule run orchestration

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use kotoba_hierarchy::TraversalError;
use kotoba_rules::engine::{EvaluationError, RuleEvaluator, RuleOutcome, TypeCache};
use kotoba_rules::model::{Inference, Issue, Rule, RuleError, RuleSet};
use kotoba_store::store::FactSource;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Report of one orchestrated run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Inferred facts, flattened in rule request order
    pub inferences: Vec<Inference>,
    /// Reported issues, flattened in rule request order
    pub issues: Vec<Issue>,
    pub stats: RunStats,
}

/// Processing statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub rules_evaluated: usize,
    pub inference_count: usize,
    pub issue_count: usize,
    pub duration_ms: u64,
}

/// Orchestration errors
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Rule evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Rule set error: {0}")]
    Rules(#[from] RuleError),

    #[error("Hierarchy traversal failed: {0}")]
    Traversal(#[from] TraversalError),

    #[error("Worker task failed: {0}")]
    Join(String),

    #[error("Run cancelled")]
    Cancelled,
}

/// Cooperative cancellation flag shared with worker tasks.
///
/// Tasks check the flag before they start evaluating; a task already
/// mid-evaluation runs to completion and its result is discarded.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Evaluate rules on one spawned task each instead of in sequence
    pub parallel: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Evaluates a list of rules against one immutable store snapshot.
///
/// 評価結果はタスクの完了順ではなく、ルールが要求された順に並ぶ。
/// Output is therefore identical between parallel and sequential runs.
pub struct RuleOrchestrator {
    options: RunOptions,
}

impl RuleOrchestrator {
    pub fn new() -> Self {
        Self {
            options: RunOptions::default(),
        }
    }

    pub fn with_options(options: RunOptions) -> Self {
        Self { options }
    }

    /// Evaluate every rule in the set, in registration order
    pub async fn run_all<S>(&self, store: Arc<S>, rules: &RuleSet) -> Result<RunReport, EngineError>
    where
        S: FactSource + 'static,
    {
        let selected: Vec<Arc<Rule>> = rules.iter().cloned().collect();
        self.run_rules(store, selected, CancelToken::new()).await
    }

    /// Evaluate the named rules, in the order the names were given.
    /// Unknown names fail the run before any evaluation starts.
    pub async fn run_named<S>(
        &self,
        store: Arc<S>,
        rules: &RuleSet,
        names: &[&str],
    ) -> Result<RunReport, EngineError>
    where
        S: FactSource + 'static,
    {
        let selected = rules.select(names)?;
        self.run_rules(store, selected, CancelToken::new()).await
    }

    /// Same as [`RuleOrchestrator::run_named`] with external cancellation
    pub async fn run_named_with_cancel<S>(
        &self,
        store: Arc<S>,
        rules: &RuleSet,
        names: &[&str],
        cancel: CancelToken,
    ) -> Result<RunReport, EngineError>
    where
        S: FactSource + 'static,
    {
        let selected = rules.select(names)?;
        self.run_rules(store, selected, cancel).await
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    async fn run_rules<S>(
        &self,
        store: Arc<S>,
        rules: Vec<Arc<Rule>>,
        cancel: CancelToken,
    ) -> Result<RunReport, EngineError>
    where
        S: FactSource + 'static,
    {
        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = std::time::Instant::now();
        info!("Starting run {} over {} rules", run_id, rules.len());

        // One cache for the whole run, covering every class the selected
        // rules reference, shared read-only with the worker tasks
        let cache = Arc::new(TypeCache::build(
            rules.iter().map(|rule| rule.as_ref()),
            store.as_ref(),
        )?);

        let outcomes = if self.options.parallel {
            let handles: Vec<_> = rules
                .iter()
                .map(|rule| {
                    let store = Arc::clone(&store);
                    let cache = Arc::clone(&cache);
                    let rule = Arc::clone(rule);
                    let cancel = cancel.clone();
                    tokio::spawn(
                        async move { evaluate_rule(store.as_ref(), &cache, &rule, &cancel) },
                    )
                })
                .collect();

            // Joined results keep spawn order, so the collect below picks
            // the first failure in request order and output stays stable.
            let joined = try_join_all(handles)
                .await
                .map_err(|error| EngineError::Join(error.to_string()))?;
            joined.into_iter().collect::<Result<Vec<_>, _>>()?
        } else {
            let mut outcomes = Vec::with_capacity(rules.len());
            for rule in &rules {
                outcomes.push(evaluate_rule(store.as_ref(), &cache, rule, &cancel)?);
            }
            outcomes
        };

        let mut inferences = Vec::new();
        let mut issues = Vec::new();
        for outcome in outcomes {
            inferences.extend(outcome.inferences);
            issues.extend(outcome.issues);
        }

        let stats = RunStats {
            rules_evaluated: rules.len(),
            inference_count: inferences.len(),
            issue_count: issues.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "Run {} complete: {} inferences, {} issues",
            run_id, stats.inference_count, stats.issue_count
        );

        Ok(RunReport {
            run_id,
            started_at,
            inferences,
            issues,
            stats,
        })
    }
}

impl Default for RuleOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

fn evaluate_rule<S: FactSource + ?Sized>(
    store: &S,
    cache: &TypeCache,
    rule: &Rule,
    cancel: &CancelToken,
) -> Result<RuleOutcome, EngineError> {
    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
    }
    let evaluator = RuleEvaluator::new(store, cache);
    Ok(evaluator.evaluate(rule)?)
}
