use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::deal::DealInputs;
use crate::types::Money;

/// Listing data for a property as supplied by the caller.
///
/// Only `id` is required; anything else may be unknown. The engine reads
/// snapshots but never modifies them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySnapshot {
    pub id: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub listing_price: Option<Money>,
    #[serde(default)]
    pub sqft: Option<u32>,
    #[serde(default, alias = "lot_sqft")]
    pub lot_size: Option<u32>,
    #[serde(default)]
    pub beds: Option<Decimal>,
    #[serde(default)]
    pub baths: Option<Decimal>,
    #[serde(default)]
    pub home_type: Option<String>,
    #[serde(default)]
    pub year_built: Option<u16>,
    /// Monthly HOA dues
    #[serde(default)]
    pub hoa_fee: Option<Money>,
    #[serde(default)]
    pub annual_tax: Option<Money>,
    #[serde(default)]
    pub last_sold_price: Option<Money>,
    #[serde(default)]
    pub last_sold_date: Option<NaiveDate>,
}

impl PropertySnapshot {
    pub fn price_per_sqft(&self) -> Option<Money> {
        match (self.listing_price, self.sqft) {
            (Some(price), Some(sqft)) if sqft > 0 => Some(price / Decimal::from(sqft)),
            _ => None,
        }
    }
}

impl DealInputs {
    /// Pre-populate zero-valued inputs from listing data.
    ///
    /// Fills purchase price from the listing price, yearly taxes from the
    /// annual tax and HOA dues from the HOA fee. Values the caller already
    /// entered are left alone. Returns the names of the fields that were
    /// filled.
    pub fn prefill_from_snapshot(&mut self, snapshot: &PropertySnapshot) -> Vec<&'static str> {
        let mut filled = Vec::new();

        let acquisition = self.acquisition_mut();
        if let Some(price) = snapshot.listing_price {
            if acquisition.purchase_price.is_zero() && price > Decimal::ZERO {
                acquisition.purchase_price = price;
                filled.push("purchase_price");
            }
        }

        let expenses = self.expenses_mut();
        if let Some(tax) = snapshot.annual_tax {
            if expenses.yearly_taxes.is_zero() && tax > Decimal::ZERO {
                expenses.yearly_taxes = tax;
                filled.push("yearly_taxes");
            }
        }
        if let Some(hoa) = snapshot.hoa_fee {
            if expenses.hoa_fees.is_zero() && hoa > Decimal::ZERO {
                expenses.hoa_fees = hoa;
                filled.push("hoa_fees");
            }
        }

        filled
    }
}
