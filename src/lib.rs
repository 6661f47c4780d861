#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(unused_must_use)]
pub mod client;
pub mod context;
pub mod deposit;
pub mod execution;
pub mod form;
pub mod types;
pub mod utils;
