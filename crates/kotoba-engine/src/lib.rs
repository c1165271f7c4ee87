//! # Kotoba Engine
//!
//! Rule orchestration and vocabulary engine facade
//! Runs reasoner and validator catalogs over fact stores

pub mod engine;
pub mod orchestration;
pub mod report;

pub use engine::*;
pub use orchestration::*;
pub use report::*;
