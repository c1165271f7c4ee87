//! # Kotoba - SKOS Vocabulary Reasoning & Validation Stack
//!
//! Kotoba is a Rust stack for checking and enriching SKOS vocabulary data.
//! Declarative rules — conjunctions of typed atoms plus builtin filters —
//! drive both validation (consistency issues) and reasoning (derived
//! facts) over an indexed fact store, with cycle-safe hierarchy traversal
//! and deterministic parallel rule runs on top.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kotoba::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create an engine with the stock SKOS catalogs
//!     let mut engine = VocabularyEngine::new();
//!     engine.register_reasoners(kotoba::skos::reasoner_rules()?)?;
//!     engine.register_validators(kotoba::skos::validator_rules()?)?;
//!     for spec in kotoba::skos::hierarchy_relations() {
//!         engine.register_hierarchy(spec);
//!     }
//!
//!     // Load some vocabulary facts
//!     engine
//!         .insert(Assertion::resource(
//!             Iri::new("http://example.org/mammals"),
//!             vocabulary::skos_broader(),
//!             Iri::new("http://example.org/animals"),
//!         ))
//!         .await;
//!
//!     // Infer, then validate
//!     let outcome = engine.process().await?;
//!     println!(
//!         "{} inferences, conforms: {}",
//!         outcome.inferences.len(),
//!         outcome.report.conforms
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Kotoba consists of several specialized crates:
//!
//! - **`kotoba-core`**: Assertion data model and RDF/SKOS vocabulary
//! - **`kotoba-store`**: Indexed in-memory fact store
//! - **`kotoba-rules`**: Rule model, nested-loop join evaluator, type cache
//! - **`kotoba-hierarchy`**: Cycle-safe reachability, closure, flattening
//! - **`kotoba-engine`**: Parallel rule orchestration and engine facade
//! - **`kotoba-domain-skos`**: SKOS validator and reasoner catalogs
//!
//! ## Feature Flags
//!
//! - `full` (default): All crates included
//! - `core`: Only the data model
//! - `store`: Fact store
//! - `rules`: Rule model and evaluator
//! - `hierarchy`: Graph traversal
//! - `engine`: Orchestration and facade
//! - `skos`: SKOS rule catalogs

// Re-export all public APIs from sub-crates (feature-gated)

#[cfg(feature = "kotoba-core")]
pub use kotoba_core as core;

#[cfg(feature = "kotoba-store")]
pub use kotoba_store as store;

#[cfg(feature = "kotoba-rules")]
pub use kotoba_rules as rules;

#[cfg(feature = "kotoba-hierarchy")]
pub use kotoba_hierarchy as hierarchy;

#[cfg(feature = "kotoba-engine")]
pub use kotoba_engine as engine;

#[cfg(feature = "kotoba-domain-skos")]
pub use kotoba_domain_skos as domain_skos;

// Convenience re-exports for common types (feature-gated)
#[cfg(feature = "kotoba-core")]
pub use kotoba_core::model;

#[cfg(feature = "kotoba-core")]
pub use kotoba_core::vocabulary;

#[cfg(feature = "kotoba-store")]
pub use kotoba_store::{FactSource, MemoryStore};

#[cfg(feature = "kotoba-rules")]
pub use kotoba_rules::{Rule, RuleSet};

#[cfg(feature = "kotoba-engine")]
pub use kotoba_engine::{EngineError, RuleOrchestrator, ValidationReport, VocabularyEngine};

// Commonly used external dependencies
pub use anyhow;
pub use serde;
pub use serde_json;
pub use tokio;

/// Prelude module for convenient imports
///
/// ```rust
/// use kotoba::prelude::*;
/// ```
pub mod prelude {
    // Core types (feature-gated)
    #[cfg(feature = "kotoba-core")]
    pub use crate::model::*;
    #[cfg(feature = "kotoba-core")]
    pub use crate::vocabulary;

    #[cfg(feature = "kotoba-store")]
    pub use crate::FactSource;
    #[cfg(feature = "kotoba-store")]
    pub use crate::MemoryStore;

    #[cfg(feature = "kotoba-rules")]
    pub use crate::Rule;
    #[cfg(feature = "kotoba-rules")]
    pub use crate::RuleSet;

    #[cfg(feature = "kotoba-engine")]
    pub use crate::EngineError;
    #[cfg(feature = "kotoba-engine")]
    pub use crate::RuleOrchestrator;
    #[cfg(feature = "kotoba-engine")]
    pub use crate::ValidationReport;
    #[cfg(feature = "kotoba-engine")]
    pub use crate::VocabularyEngine;

    // Common external types
    pub use anyhow::Result;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;
    pub use tokio;
}

// Module declarations for organization (feature-gated)
#[cfg(feature = "kotoba-domain-skos")]
pub mod skos {
    //! SKOS domain rule catalogs
    pub use kotoba_domain_skos::*;
}

#[cfg(all(feature = "kotoba-engine", feature = "kotoba-rules"))]
pub mod reasoning {
    //! Rule evaluation and orchestration
    pub use kotoba_engine::*;
    pub use kotoba_rules::*;
}

// Version information
/// Current version of Kotoba
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check function
///
/// Returns basic system information to verify Kotoba is working correctly.
pub fn health_check() -> serde_json::Value {
    serde_json::json!({
        "status": "healthy",
        "version": VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "modules": {
            "core": true,
            "store": true,
            "rules": true,
            "hierarchy": true,
            "engine": true,
            "domain_skos": true
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check() {
        let health = health_check();
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["version"], VERSION);
    }

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.chars().all(|c| c.is_ascii_digit() || c == '.'));
    }

    #[cfg(all(feature = "kotoba-engine", feature = "kotoba-domain-skos"))]
    #[tokio::test]
    async fn test_stock_engine_creation() {
        let mut engine = VocabularyEngine::new();
        engine
            .register_reasoners(skos::reasoner_rules().unwrap())
            .unwrap();
        engine
            .register_validators(skos::validator_rules().unwrap())
            .unwrap();
        let report = engine.validate().await.unwrap();
        assert!(report.conforms);
    }
}
