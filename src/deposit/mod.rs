pub mod ratio;

pub use ratio::{RatioEngine, derive_inactive_field};
