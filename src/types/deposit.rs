use serde::{Deserialize, Serialize};
use std::fmt;

/// Which deposit field the user edited last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActiveField {
    Token0,
    Token1,
}

impl ActiveField {
    pub fn other(&self) -> ActiveField {
        match self {
            ActiveField::Token0 => ActiveField::Token1,
            ActiveField::Token1 => ActiveField::Token0,
        }
    }
}

impl fmt::Display for ActiveField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveField::Token0 => write!(f, "token0"),
            ActiveField::Token1 => write!(f, "token1"),
        }
    }
}

/// The two linked deposit fields.
///
/// The field that is not `active` always holds a value derived from the
/// active one and the current reserves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositPair {
    pub token0_amount: String,
    pub token1_amount: String,
    pub active: Option<ActiveField>,
}

impl DepositPair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(&self, field: ActiveField) -> &str {
        match field {
            ActiveField::Token0 => &self.token0_amount,
            ActiveField::Token1 => &self.token1_amount,
        }
    }

    pub fn set_amount(&mut self, field: ActiveField, value: String) {
        match field {
            ActiveField::Token0 => self.token0_amount = value,
            ActiveField::Token1 => self.token1_amount = value,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.token0_amount.is_empty() && !self.token1_amount.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
