//! Fact store implementation with pattern matching

use kotoba_core::model::{Assertion, Iri, Term};
use kotoba_core::vocabulary;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors reported by fact sources
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store access failed: {message}")]
    AccessFailed { message: String },
}

/// Read contract the rule engine requires from a fact source.
///
/// The in-memory store below never fails; the methods return `Result` so
/// that backends with real I/O can surface failures through the same
/// contract.
pub trait FactSource: Send + Sync {
    /// All assertions matching the given pattern. `None` positions are
    /// wildcards. Resources match on identity, literals structurally
    /// (value, language tag and datatype). Output order is deterministic
    /// for a given store state.
    fn matching(
        &self,
        subject: Option<&Iri>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Result<Vec<Assertion>, StoreError>;

    /// Fully bound membership test
    fn contains(&self, subject: &Iri, predicate: &Iri, object: &Term) -> Result<bool, StoreError> {
        Ok(!self
            .matching(Some(subject), Some(predicate), Some(object))?
            .is_empty())
    }

    /// All individuals asserted as `rdf:type class`, in store order
    fn class_members(&self, class: &Iri) -> Result<Vec<Iri>, StoreError> {
        let rdf_type = vocabulary::rdf_type();
        let class_term = Term::Resource(class.clone());
        let members = self
            .matching(None, Some(&rdf_type), Some(&class_term))?
            .into_iter()
            .map(|assertion| assertion.subject)
            .collect();
        Ok(members)
    }

    /// True when `individual rdf:type class` is asserted
    fn has_class_member(&self, class: &Iri, individual: &Iri) -> Result<bool, StoreError> {
        let rdf_type = vocabulary::rdf_type();
        self.contains(individual, &rdf_type, &Term::Resource(class.clone()))
    }
}

/// Indexed in-memory assertion store
///
/// Assertions keep insertion order; the per-position indices hold
/// positions into that order, so every query path yields a stable order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    assertions: Vec<Assertion>,
    subject_index: HashMap<Iri, Vec<usize>>,
    predicate_index: HashMap<Iri, Vec<usize>>,
    object_index: HashMap<Term, Vec<usize>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an assertion. Returns `false` when an identical assertion
    /// is already present, so writing inferred facts back is idempotent.
    pub fn insert(&mut self, assertion: Assertion) -> bool {
        if self.holds(&assertion) {
            return false;
        }

        let index = self.assertions.len();
        self.subject_index
            .entry(assertion.subject.clone())
            .or_default()
            .push(index);
        self.predicate_index
            .entry(assertion.predicate.clone())
            .or_default()
            .push(index);
        self.object_index
            .entry(assertion.object.clone())
            .or_default()
            .push(index);
        self.assertions.push(assertion);
        true
    }

    /// Insert many assertions, returning how many were new
    pub fn extend<I: IntoIterator<Item = Assertion>>(&mut self, assertions: I) -> usize {
        let mut inserted = 0;
        for assertion in assertions {
            if self.insert(assertion) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Remove all assertions and reset the indexes
    pub fn clear(&mut self) {
        self.assertions.clear();
        self.subject_index.clear();
        self.predicate_index.clear();
        self.object_index.clear();
    }

    pub fn len(&self) -> usize {
        self.assertions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// All assertions in insertion order
    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    /// Get statistics
    pub fn statistics(&self) -> StoreStatistics {
        StoreStatistics {
            total_assertions: self.assertions.len(),
            distinct_subjects: self.subject_index.len(),
            distinct_predicates: self.predicate_index.len(),
        }
    }

    fn holds(&self, assertion: &Assertion) -> bool {
        match self.subject_index.get(&assertion.subject) {
            Some(indices) => indices.iter().any(|&idx| self.assertions[idx] == *assertion),
            None => false,
        }
    }
}

impl FactSource for MemoryStore {
    fn matching(
        &self,
        subject: Option<&Iri>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Result<Vec<Assertion>, StoreError> {
        // Use the most selective index available
        let candidates: Vec<usize> = if let Some(subj) = subject {
            self.subject_index.get(subj).cloned().unwrap_or_default()
        } else if let Some(pred) = predicate {
            self.predicate_index.get(pred).cloned().unwrap_or_default()
        } else if let Some(obj) = object {
            self.object_index.get(obj).cloned().unwrap_or_default()
        } else {
            // No pattern - return all assertions
            (0..self.assertions.len()).collect()
        };

        // Filter candidates by the remaining constraints
        let matches = candidates
            .into_iter()
            .map(|idx| &self.assertions[idx])
            .filter(|assertion| {
                if let Some(s) = subject {
                    if assertion.subject != *s {
                        return false;
                    }
                }
                if let Some(p) = predicate {
                    if assertion.predicate != *p {
                        return false;
                    }
                }
                if let Some(o) = object {
                    if assertion.object != *o {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        Ok(matches)
    }

    fn contains(&self, subject: &Iri, predicate: &Iri, object: &Term) -> Result<bool, StoreError> {
        Ok(self.holds(&Assertion::new(
            subject.clone(),
            predicate.clone(),
            object.clone(),
        )))
    }
}

/// Store statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatistics {
    pub total_assertions: usize,
    pub distinct_subjects: usize,
    pub distinct_predicates: usize,
}
