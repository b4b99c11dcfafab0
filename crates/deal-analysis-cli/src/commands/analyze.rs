use clap::Args;
use serde_json::{json, Map, Value};
use tracing::info;

use deal_analysis_core::engine::StrategyComparison;
use deal_analysis_core::{analyze_deal, compare_strategies, format_response, DealInputs, PropertySnapshot};

use crate::input;

/// Headline columns of a side-by-side comparison.
const COMPARE_COLUMNS: [&str; 8] = [
    "noi",
    "cap_rate",
    "coc_return",
    "monthly_cash_flow",
    "dscr",
    "total_cash_invested",
    "mao",
    "offer_spread",
];

/// Arguments for a single deal analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JSON or YAML deal file (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Property snapshot used to fill purchase price, taxes and HOA left at zero
    #[arg(long)]
    pub property: Option<String>,

    /// Print the unrounded computation envelope instead of the rounded response
    #[arg(long)]
    pub raw: bool,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut deal: DealInputs = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <deal.json|deal.yaml> or stdin required for analyze".into());
    };

    if let Some(ref path) = args.property {
        let snapshot: PropertySnapshot = input::file::read_input(path)?;
        let filled = deal.prefill_from_snapshot(&snapshot);
        info!(property = %snapshot.id, ?filled, "inputs prefilled from property snapshot");
    }

    let output = analyze_deal(&deal)?;
    if args.raw {
        return Ok(serde_json::to_value(output)?);
    }
    Ok(serde_json::to_value(format_response(deal.strategy(), &output))?)
}

/// Arguments for a strategy comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON or YAML array of deal inputs (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Property snapshot applied to every deal before analysis
    #[arg(long)]
    pub property: Option<String>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut deals: Vec<DealInputs> = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <deals.json|deals.yaml> or stdin required for compare".into());
    };
    if deals.is_empty() {
        return Err("compare needs at least one deal".into());
    }

    if let Some(ref path) = args.property {
        let snapshot: PropertySnapshot = input::file::read_input(path)?;
        for deal in deals.iter_mut() {
            deal.prefill_from_snapshot(&snapshot);
        }
    }

    let comparisons = compare_strategies(&deals);
    let rows = comparisons
        .iter()
        .map(comparison_row)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(json!({ "results": rows }))
}

/// Flatten one comparison into a fixed set of columns so rental and flip
/// rows line up in table and CSV output.
fn comparison_row(comparison: &StrategyComparison) -> Result<Value, serde_json::Error> {
    let mut row = Map::new();
    row.insert("strategy".into(), json!(comparison.strategy));

    let result = match &comparison.response {
        Some(response) => serde_json::to_value(&response.result)?,
        None => Value::Null,
    };
    for column in COMPARE_COLUMNS {
        row.insert(
            column.into(),
            result.get(column).cloned().unwrap_or(Value::Null),
        );
    }

    let warnings = comparison
        .response
        .as_ref()
        .map(|r| r.warnings.len())
        .unwrap_or(0);
    row.insert("warnings".into(), json!(warnings));
    row.insert("error".into(), json!(comparison.error));
    Ok(Value::Object(row))
}
