pub mod chain;
pub mod dry_run;

#[cfg(test)]
pub mod mock;

pub use chain::{CallFailure, ChainReader, ChainWriter, Query};
pub use dry_run::DryRunClient;
