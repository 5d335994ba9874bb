//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod json_trade_log;
pub mod line_feed;
pub mod shadow_venue;
