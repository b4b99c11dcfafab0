//! Property-based tests for the analysis identities.
//!
//! Each property must hold for any valid combination of inputs, generated
//! with `proptest`.

use deal_analysis_core::amortization::{amortization_schedule, monthly_payment, MONTHS_PER_YEAR};
use deal_analysis_core::deal::{
    Acquisition, FixFlipInputs, Financing, Income, OperatingExpenses, RentalInputs,
};
use deal_analysis_core::format::round_currency;
use deal_analysis_core::strategies::{analyze_fix_flip, analyze_rental};
use deal_analysis_core::Strategy as DealStrategy;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// Generators
// =============================================================================

/// Whole-cent money amount up to `max_units`.
fn arb_money(max_units: i64) -> impl Strategy<Value = Decimal> {
    (0i64..=max_units * 100).prop_map(|cents| Decimal::new(cents, 2))
}

/// Percentage on a 0-100 scale with two decimals.
fn arb_percent(max: i64) -> impl Strategy<Value = Decimal> {
    (0i64..=max * 100).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

fn arb_expenses() -> impl Strategy<Value = OperatingExpenses> {
    (
        arb_money(20_000),
        arb_money(300),
        arb_money(500),
        arb_money(300),
        arb_percent(10),
        arb_percent(10),
        arb_percent(10),
        arb_percent(12),
    )
        .prop_map(
            |(taxes, insurance, hoa, utilities, vacancy, maintenance, capex, management)| {
                OperatingExpenses {
                    yearly_taxes: taxes,
                    monthly_insurance: Some(insurance),
                    hoa_fees: hoa,
                    electricity: utilities,
                    vacancy,
                    maintenance,
                    capex,
                    management,
                    ..Default::default()
                }
            },
        )
}

fn arb_financing() -> impl Strategy<Value = Financing> {
    (
        any::<bool>(),
        arb_percent(100),
        arb_percent(15),
        arb_money(10_000),
        any::<bool>(),
        any::<bool>(),
        1u32..=30,
        0u32..=12,
    )
        .prop_map(
            |(cash, down, rate, charges, wrapped, interest_only, years, rehab_months)| Financing {
                cash,
                down_payment: down,
                interest_rate: rate,
                lender_charges: charges,
                loan_fees_wrapped: wrapped,
                pmi: Decimal::ZERO,
                years_amortized: years,
                interest_only,
                rehab_months,
            },
        )
}

fn arb_rental() -> impl Strategy<Value = RentalInputs> {
    (
        arb_money(1_000_000),
        arb_money(20_000),
        arb_money(100_000),
        arb_financing(),
        arb_money(10_000),
        arb_expenses(),
    )
        .prop_map(|(price, closing, rehab, financing, rent, expenses)| RentalInputs {
            acquisition: Acquisition {
                purchase_price: price,
                closing_costs: closing,
                rehab,
                arv: None,
            },
            financing,
            refinance: None,
            income: Income {
                monthly_rent: rent,
                ..Default::default()
            },
            expenses,
        })
}

fn arb_flip() -> impl Strategy<Value = FixFlipInputs> {
    (
        arb_rental(),
        1i64..=2_000_000,
        arb_money(200_000),
        0u32..=12,
    )
        .prop_map(|(rental, arv, profit, selling_months)| FixFlipInputs {
            acquisition: Acquisition {
                arv: Some(Decimal::from(arv)),
                ..rental.acquisition
            },
            financing: rental.financing,
            income: Income::default(),
            expenses: rental.expenses,
            expected_profit: profit,
            selling_months,
        })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// NOI is exactly gross income less operating expenses, before rounding.
    #[test]
    fn prop_noi_identity(input in arb_rental()) {
        let result = analyze_rental(DealStrategy::BuyAndRent, &input).unwrap();
        let m = &result.result;
        prop_assert_eq!(m.noi, m.annual_gross_income - m.annual_operating_expenses);
        prop_assert_eq!(m.annual_operating_expenses, m.expense_breakdown.total);
    }

    /// All-cash purchases carry no debt and invest the whole acquisition cost.
    #[test]
    fn prop_cash_purchase(mut input in arb_rental()) {
        input.financing.cash = true;
        let result = analyze_rental(DealStrategy::BuyAndRent, &input).unwrap();
        let m = &result.result;
        let a = &input.acquisition;

        prop_assert_eq!(m.monthly_mortgage, Decimal::ZERO);
        prop_assert_eq!(m.total_cash_invested, a.purchase_price + a.closing_costs + a.rehab);
        prop_assert!(m.dscr.is_none());
    }

    /// Cash-on-cash is reported only when cash was actually invested.
    #[test]
    fn prop_coc_defined_only_with_cash_invested(input in arb_rental()) {
        let result = analyze_rental(DealStrategy::BuyAndRent, &input).unwrap();
        let m = &result.result;
        prop_assert_eq!(m.coc_return.is_some(), m.total_cash_invested > Decimal::ZERO);
    }

    /// MAO plus every deducted cost reconstructs the ARV.
    #[test]
    fn prop_mao_identity(input in arb_flip()) {
        let result = analyze_fix_flip(&input).unwrap();
        let m = &result.result;
        let rebuilt = m.mao
            + m.expected_profit
            + m.rehab
            + m.closing_costs
            + m.holding_costs
            + m.loan_costs;
        prop_assert!((rebuilt - m.arv).abs() < dec!(0.000001), "rebuilt {} vs arv {}", rebuilt, m.arv);
    }

    /// A zero-rate loan amortizes in equal slices of principal.
    #[test]
    fn prop_zero_rate_payment(principal in arb_money(1_000_000), years in 1u32..=40) {
        prop_assume!(principal > Decimal::ZERO);
        let payment = monthly_payment(principal, Decimal::ZERO, years).unwrap();
        prop_assert_eq!(payment, principal / Decimal::from(years * MONTHS_PER_YEAR));
    }

    /// Schedule principal repays the loan, to the cent.
    #[test]
    fn prop_schedule_repays_principal(
        principal in arb_money(800_000),
        rate in arb_percent(12),
        years in 1u32..=30,
    ) {
        prop_assume!(principal > Decimal::ZERO);
        let schedule = amortization_schedule(principal, rate, years).unwrap();
        let repaid: Decimal = schedule.iter().map(|row| row.principal).sum();

        prop_assert_eq!(schedule.len() as u32, years * MONTHS_PER_YEAR);
        prop_assert_eq!(round_currency(repaid * dec!(100)), round_currency(principal * dec!(100)));
    }
}
