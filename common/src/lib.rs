//! Content Analyzer Common Library
//!
//! CLIとHTTPサーバーで共有される型とユーティリティ

pub mod error;
pub mod parser;
pub mod prompts;
pub mod types;

pub use error::{Error, Result};
pub use parser::{extract_json_object, parse_analysis_response};
pub use prompts::{build_analysis_prompt, compose_context, ANALYSIS_INSTRUCTIONS};
pub use types::{AnalysisResult, DetectedItem, PriceQuote, FALLBACK_CATEGORY};
