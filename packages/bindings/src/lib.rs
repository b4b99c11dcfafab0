use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use deal_analysis_core::amortization;
use deal_analysis_core::DealInputs;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Fixed-rate loan terms shared by the amortization endpoints.
#[derive(Deserialize)]
struct LoanTerms {
    principal: Decimal,
    /// Annual rate in percent (6.5 = 6.5%)
    #[serde(alias = "interest_rate")]
    annual_rate: Decimal,
    #[serde(alias = "years_amortized", alias = "loan_term")]
    years: u32,
}

#[derive(Serialize)]
struct PaymentResponse {
    monthly_payment: Decimal,
}

// ---------------------------------------------------------------------------
// Deal analysis
// ---------------------------------------------------------------------------

/// Strategy-tagged deal inputs in, rounded `{strategy, <metrics>, warnings}` out.
#[napi]
pub fn analyze_deal(input_json: String) -> NapiResult<String> {
    deal_analysis_core::analyze_json(&input_json).map_err(to_napi_error)
}

/// Array of deal inputs in, one comparison entry per input out. A failing
/// strategy reports its error in place rather than failing the call.
#[napi]
pub fn compare_strategies(inputs_json: String) -> NapiResult<String> {
    let inputs: Vec<DealInputs> = serde_json::from_str(&inputs_json).map_err(to_napi_error)?;
    let output = deal_analysis_core::compare_strategies(&inputs);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let payment = amortization::monthly_payment(terms.principal, terms.annual_rate, terms.years)
        .map_err(to_napi_error)?;
    serde_json::to_string(&PaymentResponse {
        monthly_payment: payment,
    })
    .map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let schedule =
        amortization::amortization_schedule(terms.principal, terms.annual_rate, terms.years)
            .map_err(to_napi_error)?;
    serde_json::to_string(&schedule).map_err(to_napi_error)
}
