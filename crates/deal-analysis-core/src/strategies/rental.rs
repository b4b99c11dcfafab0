use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::MONTHS_PER_YEAR;
use crate::deal::{RentalInputs, Strategy};
use crate::error::DealAnalysisError;
use crate::expenses::{annual_operating_expenses, ExpenseBreakdown};
use crate::financing::{resolve_financing, resolve_refinance, RefinanceResolution};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DealAnalysisResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Income-approach metrics for a hold-and-rent deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalMetrics {
    /// Net operating income (gross income less operating expenses)
    pub noi: Money,
    /// Annual income after any owner contribution, floored at zero
    pub annual_gross_income: Money,
    pub annual_operating_expenses: Money,
    /// NOI / purchase price, as a percentage
    pub cap_rate: Option<Decimal>,
    /// Annual cash flow / cash invested, as a percentage
    pub coc_return: Option<Decimal>,
    pub annual_cash_flow: Money,
    pub total_cash_invested: Money,
    pub monthly_cash_flow: Money,
    /// Debt service including PMI (post-refinance when a refinance leg exists)
    pub monthly_mortgage: Money,
    pub purchase_price: Money,
    pub loan_amount: Money,
    pub down_payment: Money,
    /// Debt service coverage ratio (NOI / annual debt service)
    pub dscr: Option<Decimal>,
    pub expense_breakdown: ExpenseBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refinance: Option<RefinanceResolution>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyse a buy-and-hold style deal (buy-and-rent, house-hack, BRRRR, ...).
pub fn analyze_rental(
    strategy: Strategy,
    input: &RentalInputs,
) -> DealAnalysisResult<ComputationOutput<RentalMetrics>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(strategy, input, &mut warnings)?;

    let acquisition = &input.acquisition;

    // --- Income (post owner contribution) ---
    let annual_gross_income = gross_annual_income(strategy, input, &mut warnings);

    // --- Operating expenses on the reduced income ---
    let expense_breakdown = annual_operating_expenses(
        &input.expenses.fixed_lines(),
        &input.expenses.variable(),
        annual_gross_income,
    );
    let annual_operating_expenses = expense_breakdown.total;
    let noi = annual_gross_income - annual_operating_expenses;

    // --- Financing, then optional refinance pass ---
    let purchase = resolve_financing(acquisition, &input.financing)?;
    let refinance = match &input.refinance {
        Some(refi) => Some(resolve_refinance(&input.financing, &purchase, refi)?),
        None => None,
    };

    let (monthly_mortgage, total_cash_invested, loan_amount) = match &refinance {
        Some(r) => (r.monthly_debt_service, r.cash_left_in_deal, r.loan_principal),
        None => (
            purchase.monthly_debt_service,
            purchase.cash_invested_at_close,
            purchase.loan_principal,
        ),
    };

    // --- Metrics ---
    let months = Decimal::from(MONTHS_PER_YEAR);
    let annual_debt_service = monthly_mortgage * months;
    let annual_cash_flow = noi - annual_debt_service;
    let monthly_cash_flow = noi / months - monthly_mortgage;

    let cap_rate = if acquisition.purchase_price > Decimal::ZERO {
        Some(noi / acquisition.purchase_price * dec!(100))
    } else {
        warnings.push("Purchase price is zero; cap rate is undefined".into());
        None
    };

    let coc_return = if total_cash_invested > Decimal::ZERO {
        Some(annual_cash_flow / total_cash_invested * dec!(100))
    } else {
        if refinance.is_some() {
            warnings.push(
                "Refinance returns all invested cash; cash-on-cash return is undefined".into(),
            );
        } else {
            warnings.push("No cash invested; cash-on-cash return is undefined".into());
        }
        None
    };

    let dscr = if annual_debt_service > Decimal::ZERO {
        Some(noi / annual_debt_service)
    } else {
        None
    };

    // --- Warnings for unusual metrics ---
    if monthly_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative monthly cash flow of {:.2}; the property does not carry itself",
            monthly_cash_flow
        ));
    }
    if let Some(d) = dscr {
        if d < dec!(1.2) {
            warnings.push(format!("DSCR of {d:.2} is below 1.20x, lender covenant risk"));
        }
    }

    let output = RentalMetrics {
        noi,
        annual_gross_income,
        annual_operating_expenses,
        cap_rate,
        coc_return,
        annual_cash_flow,
        total_cash_invested,
        monthly_cash_flow,
        monthly_mortgage,
        purchase_price: acquisition.purchase_price,
        loan_amount,
        down_payment: purchase.down_payment,
        dscr,
        expense_breakdown,
        refinance,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        &format!("Rental Income Analysis ({})", strategy.label()),
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(
    strategy: Strategy,
    input: &RentalInputs,
    warnings: &mut Vec<String>,
) -> DealAnalysisResult<()> {
    if strategy == Strategy::FixAndFlip {
        return Err(DealAnalysisError::invalid(
            "strategy",
            "Fix-and-flip deals are analysed by MAO, not rental income",
        ));
    }

    input.acquisition.validate()?;
    input.financing.validate()?;
    input.income.validate()?;
    input.expenses.validate()?;

    if strategy.requires_refinance() && input.refinance.is_none() {
        return Err(DealAnalysisError::invalid(
            "refinance",
            format!("A refinance leg is required for {}", strategy.label()),
        ));
    }

    let financing = &input.financing;
    if !financing.cash && financing.down_payment < dec!(20) && financing.pmi.is_zero() {
        warnings.push(format!(
            "Down payment of {}% is below 20% but no PMI was entered",
            financing.down_payment
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Income
// ---------------------------------------------------------------------------

fn gross_annual_income(
    strategy: Strategy,
    input: &RentalInputs,
    warnings: &mut Vec<String>,
) -> Money {
    let income = &input.income;
    let contribution = if strategy.is_owner_occupied() {
        income.personal_rent_contribution
    } else {
        if !income.personal_rent_contribution.is_zero() {
            warnings.push(format!(
                "Personal rent contribution ignored for {}; it only applies to owner-occupied strategies",
                strategy.label()
            ));
        }
        Decimal::ZERO
    };

    let monthly = income.monthly_rent + income.other_monthly_income - contribution;
    if monthly < Decimal::ZERO {
        warnings.push(
            "Personal rent contribution exceeds rental income; gross income floored at zero"
                .into(),
        );
        return Decimal::ZERO;
    }
    monthly * Decimal::from(MONTHS_PER_YEAR)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{Acquisition, Financing, Income, OperatingExpenses, Refinance};
    use rust_decimal_macros::dec;

    /// Single-family rental with fixed costs summing to 12000/yr.
    fn sample_input() -> RentalInputs {
        RentalInputs {
            acquisition: Acquisition {
                purchase_price: dec!(300000),
                closing_costs: dec!(6500),
                rehab: dec!(25000),
                arv: Some(dec!(390000)),
            },
            financing: Financing {
                cash: false,
                down_payment: dec!(20),
                interest_rate: dec!(6.5),
                lender_charges: Decimal::ZERO,
                loan_fees_wrapped: false,
                pmi: Decimal::ZERO,
                years_amortized: 30,
                interest_only: false,
                rehab_months: 3,
            },
            refinance: None,
            income: Income {
                monthly_rent: dec!(2650),
                other_monthly_income: Decimal::ZERO,
                personal_rent_contribution: Decimal::ZERO,
            },
            expenses: OperatingExpenses {
                yearly_taxes: dec!(2400),
                monthly_insurance: Some(dec!(100)),
                hoa_fees: dec!(200),
                gas: dec!(100),
                electricity: dec!(100),
                water_sewer: dec!(100),
                garbage: dec!(100),
                other: dec!(100),
                vacancy: dec!(5),
                maintenance: dec!(5),
                capex: dec!(5),
                management: dec!(5),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_noi_calculation() {
        let result = analyze_rental(Strategy::BuyAndRent, &sample_input()).unwrap();
        let out = &result.result;

        assert_eq!(out.annual_gross_income, dec!(31800));
        // 12000 fixed + 20% of 31800
        assert_eq!(out.annual_operating_expenses, dec!(18360));
        assert_eq!(out.noi, dec!(13440));
        assert_eq!(out.noi, out.annual_gross_income - out.annual_operating_expenses);
    }

    #[test]
    fn test_cap_rate() {
        let result = analyze_rental(Strategy::BuyAndRent, &sample_input()).unwrap();
        // 13440 / 300000 * 100 = 4.48
        assert_eq!(result.result.cap_rate, Some(dec!(4.48)));
    }

    #[test]
    fn test_cash_flow_and_coc() {
        let result = analyze_rental(Strategy::BuyAndRent, &sample_input()).unwrap();
        let out = &result.result;

        assert_eq!(out.annual_cash_flow, out.noi - out.monthly_mortgage * dec!(12));
        assert_eq!(out.monthly_cash_flow, out.noi / dec!(12) - out.monthly_mortgage);
        // 60000 down + 6500 closing + 25000 rehab
        assert_eq!(out.total_cash_invested, dec!(91500));

        let expected = out.annual_cash_flow / dec!(91500) * dec!(100);
        assert_eq!(out.coc_return, Some(expected));
    }

    #[test]
    fn test_all_cash_purchase() {
        let mut input = sample_input();
        input.financing.cash = true;
        let result = analyze_rental(Strategy::BuyAndRent, &input).unwrap();
        let out = &result.result;

        assert_eq!(out.monthly_mortgage, Decimal::ZERO);
        assert_eq!(out.total_cash_invested, dec!(331500));
        assert_eq!(out.annual_cash_flow, out.noi);
        assert!(out.dscr.is_none());
    }

    #[test]
    fn test_house_hack_reduces_income() {
        let mut input = sample_input();
        input.income.personal_rent_contribution = dec!(650);
        let result = analyze_rental(Strategy::HouseHack, &input).unwrap();
        let out = &result.result;

        // (2650 - 650) * 12
        assert_eq!(out.annual_gross_income, dec!(24000));
        // variable expenses use the reduced basis: 12000 + 0.20 * 24000
        assert_eq!(out.annual_operating_expenses, dec!(16800));
    }

    #[test]
    fn test_contribution_ignored_for_pure_rental() {
        let mut input = sample_input();
        input.income.personal_rent_contribution = dec!(650);
        let result = analyze_rental(Strategy::BuyAndRent, &input).unwrap();

        assert_eq!(result.result.annual_gross_income, dec!(31800));
        assert!(result.warnings.iter().any(|w| w.contains("ignored")));
    }

    #[test]
    fn test_income_floored_at_zero() {
        let mut input = sample_input();
        input.income.personal_rent_contribution = dec!(5000);
        let result = analyze_rental(Strategy::HouseHack, &input).unwrap();

        assert_eq!(result.result.annual_gross_income, Decimal::ZERO);
        assert!(result.result.noi < Decimal::ZERO);
    }

    #[test]
    fn test_zero_purchase_price_gives_no_cap_rate() {
        let mut input = sample_input();
        input.acquisition.purchase_price = Decimal::ZERO;
        input.financing.cash = true;
        let result = analyze_rental(Strategy::BuyAndRent, &input).unwrap();
        assert!(result.result.cap_rate.is_none());
    }

    #[test]
    fn test_zero_cash_invested_gives_no_coc() {
        let mut input = sample_input();
        input.acquisition.purchase_price = Decimal::ZERO;
        input.acquisition.closing_costs = Decimal::ZERO;
        input.acquisition.rehab = Decimal::ZERO;
        input.financing.cash = true;
        let result = analyze_rental(Strategy::BuyAndRent, &input).unwrap();

        assert_eq!(result.result.total_cash_invested, Decimal::ZERO);
        assert!(result.result.coc_return.is_none());
    }

    #[test]
    fn test_brrrr_requires_refinance() {
        let result = analyze_rental(Strategy::Brrrr, &sample_input());
        match result.unwrap_err() {
            DealAnalysisError::InvalidInput { field, .. } => assert_eq!(field, "refinance"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_brrrr_uses_refinanced_debt_service() {
        let mut input = sample_input();
        input.refinance = Some(Refinance {
            loan_amount: dec!(292500),
            interest_rate: dec!(7),
            lender_charges: Decimal::ZERO,
            loan_fees_wrapped: true,
            pmi: Decimal::ZERO,
            years_amortized: 30,
        });
        let result = analyze_rental(Strategy::Brrrr, &input).unwrap();
        let out = &result.result;
        let refi = out.refinance.as_ref().unwrap();

        assert_eq!(out.monthly_mortgage, refi.monthly_debt_service);
        assert_eq!(out.total_cash_invested, refi.cash_left_in_deal);
        assert_eq!(out.loan_amount, dec!(292500));
    }

    #[test]
    fn test_cash_out_refinance_leaves_coc_undefined() {
        let mut input = sample_input();
        input.refinance = Some(Refinance {
            loan_amount: dec!(350000),
            interest_rate: dec!(7),
            lender_charges: Decimal::ZERO,
            loan_fees_wrapped: true,
            pmi: Decimal::ZERO,
            years_amortized: 30,
        });
        let result = analyze_rental(Strategy::Brrrr, &input).unwrap();

        assert!(result.result.total_cash_invested < Decimal::ZERO);
        assert!(result.result.coc_return.is_none());
        assert!(result.warnings.iter().any(|w| w.contains("undefined")));
    }

    #[test]
    fn test_low_down_payment_without_pmi_warning() {
        let mut input = sample_input();
        input.financing.down_payment = dec!(5);
        let result = analyze_rental(Strategy::BuyAndRent, &input).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("PMI")));
    }

    #[test]
    fn test_fix_flip_strategy_rejected() {
        assert!(analyze_rental(Strategy::FixAndFlip, &sample_input()).is_err());
    }

    #[test]
    fn test_methodology_string() {
        let result = analyze_rental(Strategy::HouseHack, &sample_input()).unwrap();
        assert_eq!(result.methodology, "Rental Income Analysis (House Hack)");
    }
}
