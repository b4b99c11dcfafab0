pub mod amortization;
pub mod deal;
pub mod engine;
pub mod error;
pub mod expenses;
pub mod financing;
pub mod format;
pub mod property;
pub mod strategies;
pub mod types;

pub use deal::{DealInputs, Strategy};
pub use engine::{analyze_deal, analyze_json, compare_strategies, AnalysisResult, StrategyComparison};
pub use error::DealAnalysisError;
pub use format::{format_response, AnalysisResponse};
pub use property::PropertySnapshot;
pub use types::*;

/// Standard result type for all deal-analysis operations
pub type DealAnalysisResult<T> = Result<T, DealAnalysisError>;
