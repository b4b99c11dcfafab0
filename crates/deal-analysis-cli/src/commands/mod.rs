pub mod amortize;
pub mod analyze;
