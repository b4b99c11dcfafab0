//! Display rounding applied at the response boundary.
//!
//! Currency rounds to whole units and percentages to one decimal place. The
//! rounded payload is a fresh copy; analysis results themselves are never
//! rounded, so chained calculations keep full precision.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::deal::Strategy;
use crate::engine::AnalysisResult;
use crate::expenses::{ExpenseBreakdown, ExpenseLineItem};
use crate::financing::RefinanceResolution;
use crate::strategies::{FixFlipMetrics, RentalMetrics};
use crate::types::{ComputationOutput, Money};

pub const CURRENCY_DECIMALS: u32 = 0;
pub const PERCENT_DECIMALS: u32 = 1;
pub const RATIO_DECIMALS: u32 = 2;

/// Response payload handed to presentation layers. Metrics sit at the top
/// level next to `strategy` and `warnings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub strategy: Strategy,
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub warnings: Vec<String>,
}

/// Build the rounded response for a completed analysis.
pub fn format_response(
    strategy: Strategy,
    output: &ComputationOutput<AnalysisResult>,
) -> AnalysisResponse {
    AnalysisResponse {
        strategy,
        result: output.result.rounded(),
        warnings: output.warnings.clone(),
    }
}

pub fn round_currency(value: Money) -> Money {
    round(value, CURRENCY_DECIMALS)
}

pub fn round_percent(value: Decimal) -> Decimal {
    round(value, PERCENT_DECIMALS)
}

pub fn round_ratio(value: Decimal) -> Decimal {
    round(value, RATIO_DECIMALS)
}

fn round(value: Decimal, dp: u32) -> Decimal {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    // no "-0" in the payload
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Produce a display copy with every figure rounded for presentation.
pub trait DisplayRounding {
    fn rounded(&self) -> Self;
}

impl DisplayRounding for AnalysisResult {
    fn rounded(&self) -> Self {
        match self {
            AnalysisResult::Rental(m) => AnalysisResult::Rental(m.rounded()),
            AnalysisResult::FixAndFlip(m) => AnalysisResult::FixAndFlip(m.rounded()),
        }
    }
}

impl DisplayRounding for RentalMetrics {
    fn rounded(&self) -> Self {
        RentalMetrics {
            noi: round_currency(self.noi),
            annual_gross_income: round_currency(self.annual_gross_income),
            annual_operating_expenses: round_currency(self.annual_operating_expenses),
            cap_rate: self.cap_rate.map(round_percent),
            coc_return: self.coc_return.map(round_percent),
            annual_cash_flow: round_currency(self.annual_cash_flow),
            total_cash_invested: round_currency(self.total_cash_invested),
            monthly_cash_flow: round_currency(self.monthly_cash_flow),
            monthly_mortgage: round_currency(self.monthly_mortgage),
            purchase_price: round_currency(self.purchase_price),
            loan_amount: round_currency(self.loan_amount),
            down_payment: round_currency(self.down_payment),
            dscr: self.dscr.map(round_ratio),
            expense_breakdown: self.expense_breakdown.rounded(),
            refinance: self.refinance.as_ref().map(|r| r.rounded()),
        }
    }
}

impl DisplayRounding for FixFlipMetrics {
    fn rounded(&self) -> Self {
        FixFlipMetrics {
            mao: round_currency(self.mao),
            arv: round_currency(self.arv),
            expected_profit: round_currency(self.expected_profit),
            rehab: round_currency(self.rehab),
            closing_costs: round_currency(self.closing_costs),
            holding_costs: round_currency(self.holding_costs),
            loan_costs: round_currency(self.loan_costs),
            purchase_price: round_currency(self.purchase_price),
            hold_months: self.hold_months,
            projected_profit: round_currency(self.projected_profit),
            offer_spread: round_currency(self.offer_spread),
            loan_principal: round_currency(self.loan_principal),
            total_cash_invested: round_currency(self.total_cash_invested),
        }
    }
}

impl DisplayRounding for ExpenseBreakdown {
    fn rounded(&self) -> Self {
        ExpenseBreakdown {
            fixed_total: round_currency(self.fixed_total),
            variable_total: round_currency(self.variable_total),
            total: round_currency(self.total),
            lines: self
                .lines
                .iter()
                .map(|l| ExpenseLineItem {
                    label: l.label.clone(),
                    annual_amount: round_currency(l.annual_amount),
                })
                .collect(),
        }
    }
}

impl DisplayRounding for RefinanceResolution {
    fn rounded(&self) -> Self {
        RefinanceResolution {
            loan_principal: round_currency(self.loan_principal),
            payoff_balance: round_currency(self.payoff_balance),
            net_proceeds: round_currency(self.net_proceeds),
            monthly_debt_service: round_currency(self.monthly_debt_service),
            cash_left_in_deal: round_currency(self.cash_left_in_deal),
        }
    }
}
