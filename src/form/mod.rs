pub mod deposit_form;

pub use deposit_form::{DepositForm, DepositReceipt, SubmitOutcome, SubmitStep};
