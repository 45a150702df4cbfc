pub mod types;
pub mod config;
