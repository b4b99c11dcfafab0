use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{interest_only_payment, monthly_payment, remaining_balance};
use crate::deal::{Acquisition, Financing, Refinance};
use crate::error::DealAnalysisError;
use crate::types::{percent_to_rate, Money};
use crate::DealAnalysisResult;

/// Loan principal, debt service and cash needed at closing for a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingResolution {
    pub loan_principal: Money,
    pub down_payment: Money,
    /// Principal and interest (or interest only), excluding PMI
    pub monthly_payment: Money,
    /// `monthly_payment` plus PMI
    pub monthly_debt_service: Money,
    /// Lender charges paid in cash rather than wrapped into the loan
    pub lender_charges_at_close: Money,
    pub cash_invested_at_close: Money,
}

impl FinancingResolution {
    pub fn is_leveraged(&self) -> bool {
        self.loan_principal > Decimal::ZERO
    }
}

/// Outcome of refinancing the purchase loan once rehab is complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceResolution {
    pub loan_principal: Money,
    /// Purchase-loan balance retired by the refinance
    pub payoff_balance: Money,
    /// Cash returned to the investor (negative when the refinance needs cash in)
    pub net_proceeds: Money,
    pub monthly_debt_service: Money,
    /// Cash still tied up in the deal; negative means a cash-out
    pub cash_left_in_deal: Money,
}

/// Resolve the purchase loan for the given financing mode.
pub fn resolve_financing(
    acquisition: &Acquisition,
    financing: &Financing,
) -> DealAnalysisResult<FinancingResolution> {
    if financing.cash {
        return Ok(FinancingResolution {
            loan_principal: Decimal::ZERO,
            down_payment: acquisition.purchase_price,
            monthly_payment: Decimal::ZERO,
            monthly_debt_service: Decimal::ZERO,
            lender_charges_at_close: Decimal::ZERO,
            cash_invested_at_close: acquisition.purchase_price
                + acquisition.closing_costs
                + acquisition.rehab,
        });
    }

    financing.validate()?;

    let down_payment = acquisition.purchase_price * percent_to_rate(financing.down_payment);
    let (wrapped_charges, lender_charges_at_close) = if financing.loan_fees_wrapped {
        (financing.lender_charges, Decimal::ZERO)
    } else {
        (Decimal::ZERO, financing.lender_charges)
    };

    // down_payment is capped at 100% by validate(), so this never goes negative
    let loan_principal = acquisition.purchase_price - down_payment + wrapped_charges;

    let payment = if financing.interest_only {
        interest_only_payment(loan_principal, financing.interest_rate)
    } else {
        monthly_payment(loan_principal, financing.interest_rate, financing.years_amortized)?
    };

    Ok(FinancingResolution {
        loan_principal,
        down_payment,
        monthly_payment: payment,
        monthly_debt_service: payment + financing.pmi,
        lender_charges_at_close,
        cash_invested_at_close: down_payment
            + acquisition.closing_costs
            + acquisition.rehab
            + lender_charges_at_close,
    })
}

/// Second resolution pass: replace the purchase loan with the refinance loan
/// after `rehab_months` and recompute the cash left in the deal.
pub fn resolve_refinance(
    financing: &Financing,
    purchase: &FinancingResolution,
    refinance: &Refinance,
) -> DealAnalysisResult<RefinanceResolution> {
    refinance.validate()?;

    let payoff_balance = if !purchase.is_leveraged() {
        Decimal::ZERO
    } else if financing.interest_only {
        purchase.loan_principal
    } else {
        remaining_balance(
            purchase.loan_principal,
            financing.interest_rate,
            financing.years_amortized,
            financing.rehab_months,
        )?
    };

    let (wrapped_charges, charges_at_close) = if refinance.loan_fees_wrapped {
        (refinance.lender_charges, Decimal::ZERO)
    } else {
        (Decimal::ZERO, refinance.lender_charges)
    };

    let loan_principal = refinance.loan_amount + wrapped_charges;
    let payment = monthly_payment(
        loan_principal,
        refinance.interest_rate,
        refinance.years_amortized,
    )
    .map_err(|e| match e {
        DealAnalysisError::InvalidInput { field, reason } => DealAnalysisError::InvalidInput {
            field: format!("refinance.{field}"),
            reason,
        },
        other => other,
    })?;

    let monthly_debt_service = if loan_principal > Decimal::ZERO {
        payment + refinance.pmi
    } else {
        Decimal::ZERO
    };

    let net_proceeds = refinance.loan_amount - payoff_balance - charges_at_close;

    Ok(RefinanceResolution {
        loan_principal,
        payoff_balance,
        net_proceeds,
        monthly_debt_service,
        cash_left_in_deal: purchase.cash_invested_at_close - net_proceeds,
    })
}
