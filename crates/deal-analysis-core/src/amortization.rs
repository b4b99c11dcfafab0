use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DealAnalysisError;
use crate::types::{percent_to_rate, Money, Percent, Rate};
use crate::DealAnalysisResult;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Longest amortization term accepted, in years.
pub const MAX_TERM_YEARS: u32 = 100;

/// One row of a fixed-rate amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Payment number, starting at 1
    pub month: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    /// Outstanding balance after this payment
    pub balance: Money,
}

/// Monthly periodic rate from an annual percentage (6.5 -> 0.065 / 12).
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    percent_to_rate(annual_rate_percent) / Decimal::from(MONTHS_PER_YEAR)
}

/// Level monthly payment of a fixed-rate, fully amortizing loan.
///
/// `M = P * r / (1 - (1 + r)^-n)` with `r` the monthly rate and `n` the
/// number of monthly payments. A zero rate amortizes straight-line (`P / n`)
/// and a non-positive principal needs no payment at all.
pub fn monthly_payment(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: u32,
) -> DealAnalysisResult<Money> {
    if principal <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(DealAnalysisError::invalid(
            "interest_rate",
            "Interest rate cannot be negative",
        ));
    }

    let total_months = term_months(term_years)?;
    if total_months == 0 {
        return Err(DealAnalysisError::invalid(
            "years_amortized",
            "Amortization term must be at least 1 year for an amortizing loan",
        ));
    }

    let rate = monthly_rate(annual_rate_percent);
    if rate.is_zero() {
        return Ok(principal / Decimal::from(total_months));
    }

    // (1 + r)^n; on overflow (1 + r)^-n is indistinguishable from zero and the
    // payment collapses to pure interest.
    let compound = match compound_factor(rate, total_months) {
        Some(c) => c,
        None => return Ok(principal * rate),
    };

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Err(DealAnalysisError::DivisionByZero {
            context: "mortgage payment denominator".into(),
        });
    }

    Ok(principal * rate * (compound / denominator))
}

/// Interest-only monthly payment; the full principal stays due at term or sale.
pub fn interest_only_payment(principal: Money, annual_rate_percent: Percent) -> Money {
    if principal <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    principal * monthly_rate(annual_rate_percent)
}

/// Full month-by-month schedule for a fixed-rate loan.
pub fn amortization_schedule(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: u32,
) -> DealAnalysisResult<Vec<AmortizationRow>> {
    let total_months = term_months(term_years)?;
    walk_schedule(principal, annual_rate_percent, term_years, total_months)
}

/// Outstanding balance after `months_paid` level payments.
pub fn remaining_balance(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: u32,
    months_paid: u32,
) -> DealAnalysisResult<Money> {
    if principal <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    if months_paid == 0 {
        return Ok(principal);
    }
    let rows = walk_schedule(principal, annual_rate_percent, term_years, months_paid)?;
    Ok(rows.last().map(|r| r.balance).unwrap_or(principal))
}

/// Interest / principal split of payment number `month` (1-based).
pub fn payment_split(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: u32,
    month: u32,
) -> DealAnalysisResult<AmortizationRow> {
    let total_months = term_months(term_years)?;
    if month == 0 || month > total_months {
        return Err(DealAnalysisError::invalid(
            "month",
            format!("Payment number must be between 1 and {total_months}"),
        ));
    }
    let rows = walk_schedule(principal, annual_rate_percent, term_years, month)?;
    rows.into_iter().last().ok_or_else(|| {
        DealAnalysisError::invalid("principal", "Loan principal must be positive")
    })
}

/// Number of monthly payments in a term of `term_years`.
pub fn term_months(term_years: u32) -> DealAnalysisResult<u32> {
    if term_years > MAX_TERM_YEARS {
        return Err(DealAnalysisError::invalid(
            "years_amortized",
            format!("Amortization term must not exceed {MAX_TERM_YEARS} years"),
        ));
    }
    term_years.checked_mul(MONTHS_PER_YEAR).ok_or_else(|| {
        DealAnalysisError::invalid("years_amortized", "Amortization term is too long")
    })
}

/// Walk the schedule for at most `limit` payments.
fn walk_schedule(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: u32,
    limit: u32,
) -> DealAnalysisResult<Vec<AmortizationRow>> {
    if principal <= Decimal::ZERO {
        return Ok(Vec::new());
    }

    let payment = monthly_payment(principal, annual_rate_percent, term_years)?;
    let rate = monthly_rate(annual_rate_percent);
    let total_months = term_months(term_years)?;
    let months = limit.min(total_months);

    let mut rows = Vec::with_capacity(months as usize);
    let mut balance = principal;

    for month in 1..=months {
        let interest = balance * rate;
        let mut principal_part = payment - interest;
        // Final payment retires whatever decimal residue is left.
        if month == total_months || principal_part > balance {
            principal_part = balance;
        }
        balance -= principal_part;
        rows.push(AmortizationRow {
            month,
            payment: interest + principal_part,
            interest,
            principal: principal_part,
            balance,
        });
    }

    Ok(rows)
}

/// (1 + r)^n via iterative multiplication, `None` on overflow.
fn compound_factor(rate: Rate, months: u32) -> Option<Decimal> {
    let growth = Decimal::ONE + rate;
    let mut compound = Decimal::ONE;
    for _ in 0..months {
        compound = compound.checked_mul(growth)?;
    }
    Some(compound)
}
