pub mod availability;
pub mod clock;
pub mod day_classifier;
pub mod pricing;
