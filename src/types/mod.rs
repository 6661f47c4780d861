pub mod amount;
pub mod common;
pub mod deposit;
pub mod error;
pub mod execution;
pub mod pool;

pub use amount::*;
pub use common::*;
pub use deposit::*;
pub use error::*;
pub use execution::*;
pub use pool::*;
