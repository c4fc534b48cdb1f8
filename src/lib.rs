//! Media catalog service: filtered, sorted and paginated content listings
//! served over HTTP behind a degrading read-through cache.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod util;
