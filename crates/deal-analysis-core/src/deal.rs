use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{MAX_TERM_YEARS, MONTHS_PER_YEAR};
use crate::error::DealAnalysisError;
use crate::expenses::{FixedExpenseLine, VariableExpenses};
use crate::types::{Money, Percent};
use crate::DealAnalysisResult;

// ---------------------------------------------------------------------------
// Strategy discriminator
// ---------------------------------------------------------------------------

/// Acquisition / exit strategy an analysis is run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    BuyAndRent,
    BuyAndLiveAndRent,
    HouseHack,
    Brrrr,
    ShortTermRental,
    Commercial,
    FixAndFlip,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::BuyAndRent => "buy_and_rent",
            Strategy::BuyAndLiveAndRent => "buy_and_live_and_rent",
            Strategy::HouseHack => "house_hack",
            Strategy::Brrrr => "brrrr",
            Strategy::ShortTermRental => "short_term_rental",
            Strategy::Commercial => "commercial",
            Strategy::FixAndFlip => "fix_and_flip",
        }
    }

    /// Human-readable label used in methodology strings.
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::BuyAndRent => "Buy and Rent",
            Strategy::BuyAndLiveAndRent => "Buy, Live and Rent",
            Strategy::HouseHack => "House Hack",
            Strategy::Brrrr => "BRRRR",
            Strategy::ShortTermRental => "Short-Term Rental",
            Strategy::Commercial => "Commercial",
            Strategy::FixAndFlip => "Fix and Flip",
        }
    }

    /// Owner lives in part of the property and covers some of the income.
    pub fn is_owner_occupied(&self) -> bool {
        matches!(self, Strategy::BuyAndLiveAndRent | Strategy::HouseHack)
    }

    pub fn requires_refinance(&self) -> bool {
        matches!(self, Strategy::Brrrr)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Shared sub-structures
// ---------------------------------------------------------------------------

/// Purchase-side figures shared by every strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Acquisition {
    pub purchase_price: Money,
    pub closing_costs: Money,
    /// Rehab / renovation budget
    #[serde(default)]
    pub rehab: Money,
    /// After-repair value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arv: Option<Money>,
}

/// Financing mode of the purchase loan.
///
/// `cash = true` ignores every loan field. Otherwise the combination of
/// `interest_only`, `loan_fees_wrapped` and `pmi` selects how debt service and
/// cash-at-close are resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Financing {
    pub cash: bool,
    /// Down payment as a percentage (0-100) of purchase price
    #[serde(default)]
    pub down_payment: Percent,
    /// Annual interest rate percentage (6.5 = 6.5%)
    #[serde(default)]
    pub interest_rate: Percent,
    /// Origination / lender fees
    #[serde(default)]
    pub lender_charges: Money,
    /// Lender charges rolled into the loan instead of paid at closing
    #[serde(default)]
    pub loan_fees_wrapped: bool,
    /// Private mortgage insurance, monthly
    #[serde(default)]
    pub pmi: Money,
    #[serde(default, alias = "loan_term")]
    pub years_amortized: u32,
    #[serde(default)]
    pub interest_only: bool,
    #[serde(default)]
    pub rehab_months: u32,
}

/// Post-rehab refinance leg (BRRRR-style).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Refinance {
    pub loan_amount: Money,
    #[serde(default)]
    pub interest_rate: Percent,
    #[serde(default)]
    pub lender_charges: Money,
    #[serde(default)]
    pub loan_fees_wrapped: bool,
    #[serde(default)]
    pub pmi: Money,
    pub years_amortized: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Income {
    pub monthly_rent: Money,
    #[serde(default)]
    pub other_monthly_income: Money,
    /// Owner's own housing contribution (owner-occupied strategies only)
    #[serde(default)]
    pub personal_rent_contribution: Money,
}

/// Recurring operating costs. Fixed lines are monthly unless the field name
/// says otherwise; variable lines are percentages of gross income.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatingExpenses {
    #[serde(default)]
    pub yearly_taxes: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_insurance: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly_insurance: Option<Money>,
    #[serde(default)]
    pub hoa_fees: Money,
    #[serde(default)]
    pub gas: Money,
    #[serde(default)]
    pub electricity: Money,
    #[serde(default, alias = "watersewer")]
    pub water_sewer: Money,
    #[serde(default)]
    pub garbage: Money,
    #[serde(default)]
    pub cleaning: Money,
    #[serde(default)]
    pub internet: Money,
    #[serde(default)]
    pub other: Money,

    #[serde(default)]
    pub vacancy: Percent,
    #[serde(default)]
    pub maintenance: Percent,
    #[serde(default)]
    pub capex: Percent,
    #[serde(default, alias = "managment")]
    pub management: Percent,
}

// ---------------------------------------------------------------------------
// Strategy payloads
// ---------------------------------------------------------------------------

/// Inputs shared by all hold-and-rent strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalInputs {
    pub acquisition: Acquisition,
    pub financing: Financing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinance: Option<Refinance>,
    pub income: Income,
    #[serde(default)]
    pub expenses: OperatingExpenses,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixFlipInputs {
    pub acquisition: Acquisition,
    pub financing: Financing,
    /// Interim income while holding (usually zero)
    #[serde(default)]
    pub income: Income,
    #[serde(default)]
    pub expenses: OperatingExpenses,
    /// Profit the investor wants to clear on the sale
    pub expected_profit: Money,
    /// Months on market after rehab
    #[serde(default)]
    pub selling_months: u32,
}

/// Strategy-tagged analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum DealInputs {
    BuyAndRent(RentalInputs),
    BuyAndLiveAndRent(RentalInputs),
    HouseHack(RentalInputs),
    Brrrr(RentalInputs),
    ShortTermRental(RentalInputs),
    Commercial(RentalInputs),
    FixAndFlip(FixFlipInputs),
}

impl DealInputs {
    pub fn strategy(&self) -> Strategy {
        match self {
            DealInputs::BuyAndRent(_) => Strategy::BuyAndRent,
            DealInputs::BuyAndLiveAndRent(_) => Strategy::BuyAndLiveAndRent,
            DealInputs::HouseHack(_) => Strategy::HouseHack,
            DealInputs::Brrrr(_) => Strategy::Brrrr,
            DealInputs::ShortTermRental(_) => Strategy::ShortTermRental,
            DealInputs::Commercial(_) => Strategy::Commercial,
            DealInputs::FixAndFlip(_) => Strategy::FixAndFlip,
        }
    }

    pub fn acquisition(&self) -> &Acquisition {
        match self {
            DealInputs::FixAndFlip(f) => &f.acquisition,
            DealInputs::BuyAndRent(r)
            | DealInputs::BuyAndLiveAndRent(r)
            | DealInputs::HouseHack(r)
            | DealInputs::Brrrr(r)
            | DealInputs::ShortTermRental(r)
            | DealInputs::Commercial(r) => &r.acquisition,
        }
    }

    pub fn acquisition_mut(&mut self) -> &mut Acquisition {
        match self {
            DealInputs::FixAndFlip(f) => &mut f.acquisition,
            DealInputs::BuyAndRent(r)
            | DealInputs::BuyAndLiveAndRent(r)
            | DealInputs::HouseHack(r)
            | DealInputs::Brrrr(r)
            | DealInputs::ShortTermRental(r)
            | DealInputs::Commercial(r) => &mut r.acquisition,
        }
    }

    pub fn expenses_mut(&mut self) -> &mut OperatingExpenses {
        match self {
            DealInputs::FixAndFlip(f) => &mut f.expenses,
            DealInputs::BuyAndRent(r)
            | DealInputs::BuyAndLiveAndRent(r)
            | DealInputs::HouseHack(r)
            | DealInputs::Brrrr(r)
            | DealInputs::ShortTermRental(r)
            | DealInputs::Commercial(r) => &mut r.expenses,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub(crate) fn require_non_negative(field: &str, value: Money) -> DealAnalysisResult<()> {
    if value < Decimal::ZERO {
        return Err(DealAnalysisError::invalid(field, "Must not be negative"));
    }
    Ok(())
}

pub(crate) fn require_percent(field: &str, value: Percent) -> DealAnalysisResult<()> {
    if value < Decimal::ZERO || value > dec!(100) {
        return Err(DealAnalysisError::invalid(
            field,
            format!("Percentage {value} must be between 0 and 100"),
        ));
    }
    Ok(())
}

pub(crate) fn require_term_years(field: &str, years: u32) -> DealAnalysisResult<()> {
    if years > MAX_TERM_YEARS {
        return Err(DealAnalysisError::invalid(
            field,
            format!("Amortization term of {years} years exceeds the {MAX_TERM_YEARS}-year limit"),
        ));
    }
    Ok(())
}

/// Month counts share the amortization ceiling so hold arithmetic stays in range.
pub(crate) fn require_months(field: &str, months: u32) -> DealAnalysisResult<()> {
    let limit = MAX_TERM_YEARS * MONTHS_PER_YEAR;
    if months > limit {
        return Err(DealAnalysisError::invalid(
            field,
            format!("{months} months exceeds the {limit}-month limit"),
        ));
    }
    Ok(())
}

impl Acquisition {
    pub fn validate(&self) -> DealAnalysisResult<()> {
        require_non_negative("purchase_price", self.purchase_price)?;
        require_non_negative("closing_costs", self.closing_costs)?;
        require_non_negative("rehab", self.rehab)?;
        if let Some(arv) = self.arv {
            require_non_negative("arv", arv)?;
        }
        Ok(())
    }
}

impl Financing {
    pub fn validate(&self) -> DealAnalysisResult<()> {
        require_months("rehab_months", self.rehab_months)?;
        if self.cash {
            return Ok(());
        }
        require_percent("down_payment", self.down_payment)?;
        require_percent("interest_rate", self.interest_rate)?;
        require_non_negative("lender_charges", self.lender_charges)?;
        require_non_negative("pmi", self.pmi)?;
        require_term_years("years_amortized", self.years_amortized)?;
        Ok(())
    }
}

impl Refinance {
    pub fn validate(&self) -> DealAnalysisResult<()> {
        require_non_negative("refinance.loan_amount", self.loan_amount)?;
        require_percent("refinance.interest_rate", self.interest_rate)?;
        require_non_negative("refinance.lender_charges", self.lender_charges)?;
        require_non_negative("refinance.pmi", self.pmi)?;
        require_term_years("refinance.years_amortized", self.years_amortized)?;
        Ok(())
    }
}

impl Income {
    pub fn validate(&self) -> DealAnalysisResult<()> {
        require_non_negative("monthly_rent", self.monthly_rent)?;
        require_non_negative("other_monthly_income", self.other_monthly_income)?;
        require_non_negative("personal_rent_contribution", self.personal_rent_contribution)?;
        Ok(())
    }
}

impl OperatingExpenses {
    pub fn validate(&self) -> DealAnalysisResult<()> {
        if self.monthly_insurance.is_some() && self.yearly_insurance.is_some() {
            return Err(DealAnalysisError::invalid(
                "insurance",
                "Provide either monthly_insurance or yearly_insurance, not both",
            ));
        }
        for line in self.fixed_lines() {
            require_non_negative(&line.label, line.amount)?;
        }
        for (label, pct) in self.variable().lines() {
            require_percent(label, pct)?;
        }
        Ok(())
    }

    /// Fixed lines tagged with the billing period their field is quoted in.
    pub fn fixed_lines(&self) -> Vec<FixedExpenseLine> {
        let mut lines = vec![FixedExpenseLine::yearly("yearly_taxes", self.yearly_taxes)];
        if let Some(amount) = self.monthly_insurance {
            lines.push(FixedExpenseLine::monthly("monthly_insurance", amount));
        }
        if let Some(amount) = self.yearly_insurance {
            lines.push(FixedExpenseLine::yearly("yearly_insurance", amount));
        }
        lines.extend([
            FixedExpenseLine::monthly("hoa_fees", self.hoa_fees),
            FixedExpenseLine::monthly("gas", self.gas),
            FixedExpenseLine::monthly("electricity", self.electricity),
            FixedExpenseLine::monthly("water_sewer", self.water_sewer),
            FixedExpenseLine::monthly("garbage", self.garbage),
            FixedExpenseLine::monthly("cleaning", self.cleaning),
            FixedExpenseLine::monthly("internet", self.internet),
            FixedExpenseLine::monthly("other", self.other),
        ]);
        lines
    }

    pub fn variable(&self) -> VariableExpenses {
        VariableExpenses {
            vacancy: self.vacancy,
            maintenance: self.maintenance,
            capex: self.capex,
            management: self.management,
        }
    }
}
