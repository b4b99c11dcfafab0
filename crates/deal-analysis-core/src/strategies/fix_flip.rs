use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{monthly_rate, MONTHS_PER_YEAR};
use crate::deal::{require_months, FixFlipInputs, Financing};
use crate::error::DealAnalysisError;
use crate::expenses::annual_operating_expenses;
use crate::financing::{resolve_financing, FinancingResolution};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DealAnalysisResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Maximum-allowable-offer breakdown for a flip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixFlipMetrics {
    /// Highest purchase price that still clears the profit target
    pub mao: Money,
    pub arv: Money,
    pub expected_profit: Money,
    pub rehab: Money,
    pub closing_costs: Money,
    /// Operating expenses accrued over the hold
    pub holding_costs: Money,
    /// Lender charges plus interest accrued over the hold
    pub loan_costs: Money,
    pub purchase_price: Money,
    /// Rehab plus selling months
    pub hold_months: u32,
    /// Forward profit if bought at `purchase_price`
    pub projected_profit: Money,
    /// `mao - purchase_price`; negative means the asking price is too high
    pub offer_spread: Money,
    pub loan_principal: Money,
    pub total_cash_invested: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reverse-engineer the maximum allowable offer for a fix-and-flip deal.
///
/// `mao = arv - expected_profit - rehab - closing_costs - holding_costs - loan_costs`
pub fn analyze_fix_flip(
    input: &FixFlipInputs,
) -> DealAnalysisResult<ComputationOutput<FixFlipMetrics>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let arv = validate_input(input)?;
    let acquisition = &input.acquisition;
    let hold_months = input.financing.rehab_months + input.selling_months;

    // --- Financing over the hold ---
    // The purchase loan is carried interest-only over the hold.
    let carry = Financing {
        interest_only: true,
        ..input.financing.clone()
    };
    let financing = resolve_financing(acquisition, &carry)?;
    let loan_costs = loan_costs(&input.financing, &financing, hold_months);

    // --- Operating expenses pro-rated to the hold ---
    let income = &input.income;
    let gross_annual_income =
        (income.monthly_rent + income.other_monthly_income) * Decimal::from(MONTHS_PER_YEAR);
    let breakdown = annual_operating_expenses(
        &input.expenses.fixed_lines(),
        &input.expenses.variable(),
        gross_annual_income,
    );
    let holding_costs = breakdown.prorated(hold_months);

    // --- MAO ---
    let mao = arv
        - input.expected_profit
        - acquisition.rehab
        - acquisition.closing_costs
        - holding_costs
        - loan_costs;

    let projected_profit = arv
        - acquisition.purchase_price
        - acquisition.rehab
        - acquisition.closing_costs
        - holding_costs
        - loan_costs;

    let offer_spread = mao - acquisition.purchase_price;

    // --- Warnings ---
    if hold_months == 0 {
        warnings.push("Zero-month hold; no holding costs or loan costs accrued".into());
    }
    if offer_spread < Decimal::ZERO {
        warnings.push(format!(
            "Purchase price exceeds MAO by {:.2}; the profit target is not met",
            -offer_spread
        ));
    }
    if mao <= Decimal::ZERO {
        warnings.push("MAO is not positive; costs and profit target exceed ARV".into());
    }

    let output = FixFlipMetrics {
        mao,
        arv,
        expected_profit: input.expected_profit,
        rehab: acquisition.rehab,
        closing_costs: acquisition.closing_costs,
        holding_costs,
        loan_costs,
        purchase_price: acquisition.purchase_price,
        hold_months,
        projected_profit,
        offer_spread,
        loan_principal: financing.loan_principal,
        total_cash_invested: financing.cash_invested_at_close,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Fix and Flip Maximum Allowable Offer",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &FixFlipInputs) -> DealAnalysisResult<Money> {
    input.acquisition.validate()?;
    input.financing.validate()?;
    input.income.validate()?;
    input.expenses.validate()?;
    require_months("selling_months", input.selling_months)?;

    let arv = input
        .acquisition
        .arv
        .ok_or_else(|| DealAnalysisError::invalid("arv", "ARV is required for fix-and-flip"))?;
    if arv <= Decimal::ZERO {
        return Err(DealAnalysisError::invalid("arv", "ARV must be positive"));
    }
    if input.expected_profit < Decimal::ZERO {
        return Err(DealAnalysisError::invalid(
            "expected_profit",
            "Expected profit must not be negative",
        ));
    }
    Ok(arv)
}

// ---------------------------------------------------------------------------
// Loan costs
// ---------------------------------------------------------------------------

/// Lender charges plus interest-only accrual over the hold. A zero-month
/// hold carries no loan at all, so it costs nothing.
fn loan_costs(financing: &Financing, resolved: &FinancingResolution, hold_months: u32) -> Money {
    if financing.cash || hold_months == 0 {
        return Decimal::ZERO;
    }
    let accrued_interest = resolved.loan_principal
        * monthly_rate(financing.interest_rate)
        * Decimal::from(hold_months);
    financing.lender_charges + accrued_interest
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{Acquisition, Income, OperatingExpenses};
    use rust_decimal_macros::dec;

    fn sample_input() -> FixFlipInputs {
        FixFlipInputs {
            acquisition: Acquisition {
                purchase_price: dec!(300000),
                closing_costs: dec!(6500),
                rehab: dec!(25000),
                arv: Some(dec!(600000)),
            },
            financing: Financing {
                cash: false,
                down_payment: dec!(20),
                interest_rate: dec!(6),
                lender_charges: dec!(3000),
                loan_fees_wrapped: false,
                pmi: Decimal::ZERO,
                years_amortized: 30,
                interest_only: false,
                rehab_months: 4,
            },
            income: Income::default(),
            expenses: OperatingExpenses {
                yearly_taxes: dec!(2400),
                monthly_insurance: Some(dec!(100)),
                electricity: dec!(100),
                ..Default::default()
            },
            expected_profit: dec!(50000),
            selling_months: 2,
        }
    }

    #[test]
    fn test_mao_known_answer() {
        let result = analyze_fix_flip(&sample_input()).unwrap();
        let out = &result.result;

        assert_eq!(out.hold_months, 6);
        // (2400 + 1200 + 1200) * 6 / 12
        assert_eq!(out.holding_costs, dec!(2400));
        // 3000 + 240000 * 0.005 * 6
        assert_eq!(out.loan_costs, dec!(10200));
        // 600000 - 50000 - 25000 - 6500 - 2400 - 10200
        assert_eq!(out.mao, dec!(505900));
        assert_eq!(out.offer_spread, dec!(205900));
    }

    #[test]
    fn test_mao_identity() {
        let result = analyze_fix_flip(&sample_input()).unwrap();
        let out = &result.result;
        assert_eq!(
            out.mao
                + out.expected_profit
                + out.rehab
                + out.closing_costs
                + out.holding_costs
                + out.loan_costs,
            out.arv
        );
    }

    #[test]
    fn test_projected_profit_matches_spread() {
        let result = analyze_fix_flip(&sample_input()).unwrap();
        let out = &result.result;
        // projected profit beyond the target equals the offer spread
        assert_eq!(out.projected_profit - out.expected_profit, out.offer_spread);
    }

    #[test]
    fn test_zero_hold_months() {
        let mut input = sample_input();
        input.financing.rehab_months = 0;
        input.selling_months = 0;
        let result = analyze_fix_flip(&input).unwrap();
        let out = &result.result;

        assert_eq!(input.financing.lender_charges, dec!(3000));
        assert_eq!(out.holding_costs, Decimal::ZERO);
        assert_eq!(out.loan_costs, Decimal::ZERO);
        // 600000 - 50000 - 25000 - 6500
        assert_eq!(out.mao, dec!(518500));
        assert!(result.warnings.iter().any(|w| w.contains("Zero-month hold")));
    }

    #[test]
    fn test_leveraged_flip_without_term() {
        let mut input = sample_input();
        input.financing.years_amortized = 0;
        input.financing.interest_only = false;
        let result = analyze_fix_flip(&input).unwrap();
        // same interest-only carry as the 30-year payload
        assert_eq!(result.result.loan_costs, dec!(10200));
        assert_eq!(result.result.mao, dec!(505900));
    }

    #[test]
    fn test_oversized_hold_rejected() {
        let mut input = sample_input();
        input.financing.rehab_months = 1200;
        input.selling_months = u32::MAX;
        match analyze_fix_flip(&input).unwrap_err() {
            DealAnalysisError::InvalidInput { field, .. } => assert_eq!(field, "selling_months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_cash_flip_has_no_loan_costs() {
        let mut input = sample_input();
        input.financing.cash = true;
        let result = analyze_fix_flip(&input).unwrap();
        assert_eq!(result.result.loan_costs, Decimal::ZERO);
        assert_eq!(result.result.total_cash_invested, dec!(331500));
    }

    #[test]
    fn test_wrapped_fees_accrue_interest() {
        let mut input = sample_input();
        input.financing.loan_fees_wrapped = true;
        let result = analyze_fix_flip(&input).unwrap();
        // 3000 + 243000 * 0.005 * 6
        assert_eq!(result.result.loan_costs, dec!(10290));
    }

    #[test]
    fn test_overpriced_deal_warning() {
        let mut input = sample_input();
        input.acquisition.purchase_price = dec!(550000);
        let result = analyze_fix_flip(&input).unwrap();
        assert!(result.result.offer_spread < Decimal::ZERO);
        assert!(result.warnings.iter().any(|w| w.contains("exceeds MAO")));
    }

    #[test]
    fn test_missing_arv_error() {
        let mut input = sample_input();
        input.acquisition.arv = None;
        match analyze_fix_flip(&input).unwrap_err() {
            DealAnalysisError::InvalidInput { field, .. } => assert_eq!(field, "arv"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_profit_target_error() {
        let mut input = sample_input();
        input.expected_profit = dec!(-1);
        assert!(analyze_fix_flip(&input).is_err());
    }
}
