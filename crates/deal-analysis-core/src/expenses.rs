use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::MONTHS_PER_YEAR;
use crate::types::{percent_to_rate, Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Unit a fixed expense amount is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Monthly,
    Yearly,
}

impl BillingPeriod {
    pub fn periods_per_year(self) -> Decimal {
        match self {
            BillingPeriod::Monthly => dec!(12),
            BillingPeriod::Yearly => Decimal::ONE,
        }
    }
}

/// A recurring dollar-denominated cost (tax, insurance, HOA, utilities, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedExpenseLine {
    pub label: String,
    pub amount: Money,
    pub period: BillingPeriod,
}

impl FixedExpenseLine {
    pub fn monthly(label: &str, amount: Money) -> Self {
        Self {
            label: label.to_string(),
            amount,
            period: BillingPeriod::Monthly,
        }
    }

    pub fn yearly(label: &str, amount: Money) -> Self {
        Self {
            label: label.to_string(),
            amount,
            period: BillingPeriod::Yearly,
        }
    }

    pub fn annual_amount(&self) -> Money {
        self.amount * self.period.periods_per_year()
    }
}

/// Operating costs charged as a percentage (0-100) of gross annual income.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableExpenses {
    #[serde(default)]
    pub vacancy: Percent,
    #[serde(default)]
    pub maintenance: Percent,
    #[serde(default)]
    pub capex: Percent,
    #[serde(default)]
    pub management: Percent,
}

impl VariableExpenses {
    pub fn lines(&self) -> [(&'static str, Percent); 4] {
        [
            ("vacancy", self.vacancy),
            ("maintenance", self.maintenance),
            ("capex", self.capex),
            ("management", self.management),
        ]
    }

    pub fn total_percent(&self) -> Percent {
        self.lines().iter().map(|(_, pct)| *pct).sum()
    }
}

/// A single annualised expense line in the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLineItem {
    pub label: String,
    pub annual_amount: Money,
}

/// Annual operating expenses split into fixed and income-driven parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub fixed_total: Money,
    pub variable_total: Money,
    pub total: Money,
    pub lines: Vec<ExpenseLineItem>,
}

impl ExpenseBreakdown {
    /// Share of the annual total accruing over `months`.
    pub fn prorated(&self, months: u32) -> Money {
        if months == 0 {
            return Decimal::ZERO;
        }
        self.total * Decimal::from(months) / Decimal::from(MONTHS_PER_YEAR)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Sum fixed costs (normalised to a year) and percentage-of-income costs.
///
/// Zero-valued lines are kept out of the breakdown but never change the total.
pub fn annual_operating_expenses(
    fixed: &[FixedExpenseLine],
    variable: &VariableExpenses,
    gross_annual_income: Money,
) -> ExpenseBreakdown {
    let mut lines = Vec::new();

    let mut fixed_total = Decimal::ZERO;
    for line in fixed {
        let annual = line.annual_amount();
        fixed_total += annual;
        if !annual.is_zero() {
            lines.push(ExpenseLineItem {
                label: line.label.clone(),
                annual_amount: annual,
            });
        }
    }

    let mut variable_total = Decimal::ZERO;
    for (label, pct) in variable.lines() {
        let annual = percent_to_rate(pct) * gross_annual_income;
        variable_total += annual;
        if !annual.is_zero() {
            lines.push(ExpenseLineItem {
                label: label.to_string(),
                annual_amount: annual,
            });
        }
    }

    ExpenseBreakdown {
        fixed_total,
        variable_total,
        total: fixed_total + variable_total,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn twenty_percent() -> VariableExpenses {
        VariableExpenses {
            vacancy: dec!(5),
            maintenance: dec!(5),
            capex: dec!(5),
            management: dec!(5),
        }
    }

    #[test]
    fn test_fixed_plus_variable() {
        let fixed = vec![FixedExpenseLine::yearly("yearly_taxes", dec!(12000))];
        let out = annual_operating_expenses(&fixed, &twenty_percent(), dec!(31800));

        assert_eq!(out.fixed_total, dec!(12000));
        assert_eq!(out.variable_total, dec!(6360));
        assert_eq!(out.total, dec!(18360));
    }

    #[test]
    fn test_monthly_lines_are_annualised() {
        let fixed = vec![
            FixedExpenseLine::monthly("hoa_fees", dec!(50)),
            FixedExpenseLine::monthly("insurance", dec!(100)),
            FixedExpenseLine::yearly("yearly_taxes", dec!(2450)),
        ];
        let out = annual_operating_expenses(&fixed, &VariableExpenses::default(), dec!(0));
        // 600 + 1200 + 2450
        assert_eq!(out.total, dec!(4250));
        assert_eq!(out.variable_total, Decimal::ZERO);
    }

    #[test]
    fn test_zero_income_zero_variable() {
        let out = annual_operating_expenses(&[], &twenty_percent(), Decimal::ZERO);
        assert_eq!(out.total, Decimal::ZERO);
        assert!(out.lines.is_empty());
    }

    #[test]
    fn test_prorated_over_hold() {
        let fixed = vec![FixedExpenseLine::yearly("yearly_taxes", dec!(2400))];
        let out = annual_operating_expenses(&fixed, &VariableExpenses::default(), dec!(0));
        assert_eq!(out.prorated(6), dec!(1200));
        assert_eq!(out.prorated(0), Decimal::ZERO);
    }

    #[test]
    fn test_total_percent() {
        assert_eq!(twenty_percent().total_percent(), dec!(20));
    }
}
