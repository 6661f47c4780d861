pub mod config;
pub mod formatters;
pub mod logger;
