pub mod contract;

pub use contract::{ContractContext, ContractSnapshot};
