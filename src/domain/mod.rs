//! Core domain types and logic.

pub mod backtest;
pub mod bar;
pub mod config_validation;
pub mod error;
pub mod execution;
pub mod indicator;
pub mod live;
pub mod order;
pub mod position;
pub mod risk;
pub mod strategy;
pub mod timeframe;
pub mod venue;
