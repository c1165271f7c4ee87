//! # SKOS Vocabulary Rules Library
//!
//! SKOS語彙特化の検証・推論ルールカタログ
//! 階層矛盾、マッピング矛盾、ラベル重複などの検知と
//! 逆・対称・含意関係の導出

pub mod reasoners;
pub mod validators;

pub use reasoners::*;
pub use validators::*;
