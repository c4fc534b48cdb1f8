pub mod catalog;
pub mod detail;
pub mod error;
pub mod insights;
pub mod metrics;
pub mod pagination;
pub mod query;
pub mod repos;
