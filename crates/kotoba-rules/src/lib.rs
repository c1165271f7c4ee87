//! # Kotoba Rules
//!
//! SKOS知識ベースに対する宣言的ルール
//! アトム・ビルトイン・構築時の安全性検証とネステッドループ結合の評価を提供

pub mod engine;
pub mod model;

pub use engine::*;
pub use model::*;
