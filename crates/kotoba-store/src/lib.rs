//! # Kotoba Store
//!
//! インメモリのファクトストア
//! ルール評価が読み取る契約 (FactSource) と索引付きの実装を提供

pub mod store;

pub use store::*;
