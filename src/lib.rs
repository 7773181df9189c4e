//! Content Analyzer
//!
//! 画像をAIプロバイダで解析し、アップロード履歴から学習した嗜好を
//! 次回以降のプロンプトに反映する。

pub mod ai_provider;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod learning;
pub mod scanner;
pub mod server;

pub use content_analyzer_common::{AnalysisResult, DetectedItem, PriceQuote};
