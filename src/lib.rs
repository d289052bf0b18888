//! NiftyBot Library
//!
//! Intraday RSI and opening-range confluence insights for NIFTY 50 / NIFTY BANK

pub mod config;
pub mod error;
pub mod features;
pub mod monitor;
pub mod oracle;
pub mod strategy;
pub mod types;
