//! Port traits: the seams between the trading core and the outside world.

pub mod bar_stream_port;
pub mod config_port;
pub mod data_port;
pub mod trade_log_port;
pub mod venue_port;
