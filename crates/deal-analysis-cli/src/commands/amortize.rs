use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use deal_analysis_core::amortization::{amortization_schedule, monthly_payment, payment_split};
use deal_analysis_core::format::round_currency;

use crate::input;

/// Arguments for loan amortization
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (6.5 = 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Amortization term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Show only the interest / principal split of this payment number
    #[arg(long)]
    pub month: Option<u32>,

    /// Print the full month-by-month schedule
    #[arg(long)]
    pub schedule: bool,
}

#[derive(Deserialize)]
struct LoanTerms {
    principal: Decimal,
    rate: Decimal,
    #[serde(alias = "years_amortized")]
    years: u32,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
        }
    };

    if let Some(month) = args.month {
        let row = payment_split(terms.principal, terms.rate, terms.years, month)?;
        return Ok(json!({ "result": row }));
    }

    let rows = amortization_schedule(terms.principal, terms.rate, terms.years)?;
    if args.schedule {
        return Ok(serde_json::to_value(rows)?);
    }

    let payment = monthly_payment(terms.principal, terms.rate, terms.years)?;
    let total_interest: Decimal = rows.iter().map(|r| r.interest).sum();
    Ok(json!({
        "result": {
            "monthly_payment": round_currency(payment),
            "payments": rows.len(),
            "total_interest": round_currency(total_interest),
            "total_paid": round_currency(terms.principal + total_interest),
        },
        "methodology": "Fixed-rate level payment amortization",
    }))
}
