pub mod classifier;
pub mod orchestrator;

pub use classifier::{FailureKind, classify_failure};
pub use orchestrator::TransactionOrchestrator;
