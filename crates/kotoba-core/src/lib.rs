//! # Kotoba Core
//!
//! SKOS語彙データのためのコアデータモデル
//! 主語・述語・目的語のアサーションと RDF/SKOS 語彙定数を提供

pub mod model;
pub mod vocabulary;

pub use model::*;
