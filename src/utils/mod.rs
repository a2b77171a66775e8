pub mod config;
pub mod tables;
pub mod units;
