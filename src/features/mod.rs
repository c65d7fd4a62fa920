pub mod cache;
pub mod errors;
pub mod metrics;
pub mod pendencies;
