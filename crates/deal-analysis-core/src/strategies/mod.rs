//! Strategy calculators. Each composes the expense aggregator and the
//! financing resolver into the metric set its strategy is judged by.

pub mod fix_flip;
pub mod rental;

pub use fix_flip::{analyze_fix_flip, FixFlipMetrics};
pub use rental::{analyze_rental, RentalMetrics};
