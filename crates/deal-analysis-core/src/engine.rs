use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::deal::{DealInputs, Strategy};
use crate::format::{format_response, AnalysisResponse};
use crate::strategies::{analyze_fix_flip, analyze_rental, FixFlipMetrics, RentalMetrics};
use crate::types::ComputationOutput;
use crate::DealAnalysisResult;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Strategy-dependent analysis outcome, serialised as a flat metrics object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Rental(RentalMetrics),
    FixAndFlip(FixFlipMetrics),
}

impl AnalysisResult {
    pub fn as_rental(&self) -> Option<&RentalMetrics> {
        match self {
            AnalysisResult::Rental(m) => Some(m),
            AnalysisResult::FixAndFlip(_) => None,
        }
    }

    pub fn as_fix_flip(&self) -> Option<&FixFlipMetrics> {
        match self {
            AnalysisResult::FixAndFlip(m) => Some(m),
            AnalysisResult::Rental(_) => None,
        }
    }
}

/// One entry of a side-by-side strategy comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<AnalysisResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run the calculator selected by the input's strategy discriminator.
pub fn analyze_deal(inputs: &DealInputs) -> DealAnalysisResult<ComputationOutput<AnalysisResult>> {
    let strategy = inputs.strategy();

    let outcome = match inputs {
        DealInputs::FixAndFlip(f) => {
            analyze_fix_flip(f).map(|out| out.map(AnalysisResult::FixAndFlip))
        }
        DealInputs::BuyAndRent(r)
        | DealInputs::BuyAndLiveAndRent(r)
        | DealInputs::HouseHack(r)
        | DealInputs::Brrrr(r)
        | DealInputs::ShortTermRental(r)
        | DealInputs::Commercial(r) => {
            analyze_rental(strategy, r).map(|out| out.map(AnalysisResult::Rental))
        }
    };

    match &outcome {
        Ok(output) => match &output.result {
            AnalysisResult::Rental(m) => debug!(
                strategy = %strategy,
                noi = %m.noi,
                monthly_cash_flow = %m.monthly_cash_flow,
                warnings = output.warnings.len(),
                "rental deal analysed"
            ),
            AnalysisResult::FixAndFlip(m) => debug!(
                strategy = %strategy,
                mao = %m.mao,
                hold_months = m.hold_months,
                warnings = output.warnings.len(),
                "flip deal analysed"
            ),
        },
        Err(e) => warn!(strategy = %strategy, error = %e, "deal analysis rejected"),
    }

    outcome
}

/// JSON request in, rounded JSON response out.
pub fn analyze_json(payload: &str) -> DealAnalysisResult<String> {
    let inputs: DealInputs = serde_json::from_str(payload)?;
    let output = analyze_deal(&inputs)?;
    let response = format_response(inputs.strategy(), &output);
    Ok(serde_json::to_string(&response)?)
}

/// Analyse several strategies independently; one failure does not affect the
/// others.
pub fn compare_strategies(inputs: &[DealInputs]) -> Vec<StrategyComparison> {
    #[cfg(feature = "parallel")]
    let comparisons = inputs.par_iter().map(compare_one).collect();
    #[cfg(not(feature = "parallel"))]
    let comparisons = inputs.iter().map(compare_one).collect();
    comparisons
}

fn compare_one(inputs: &DealInputs) -> StrategyComparison {
    let strategy = inputs.strategy();
    match analyze_deal(inputs) {
        Ok(output) => StrategyComparison {
            strategy,
            response: Some(format_response(strategy, &output)),
            error: None,
        },
        Err(e) => StrategyComparison {
            strategy,
            response: None,
            error: Some(e.to_string()),
        },
    }
}
