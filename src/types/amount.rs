use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Result, VaultError};

/// Largest mantissa a `Decimal` can hold (2^96 - 1).
const DECIMAL_MAX_MANTISSA: u128 = 79_228_162_514_264_337_593_543_950_335;

/// Integer-scaled on-chain token amount.
///
/// All deposit, allowance and slippage arithmetic that reaches the router is
/// done on this type; floating or decimal display values never go on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Wei(U256);

impl Wei {
    pub const ZERO: Wei = Wei(U256::zero());

    pub fn new(raw: U256) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Exact decimal-string to fixed-point conversion.
    ///
    /// Fractional digits beyond `decimals` are dropped, never rounded.
    pub fn parse_units(value: &str, decimals: u32) -> Result<Self> {
        let value = value.trim();
        let (int_part, frac_part) = value.split_once('.').unwrap_or((value, ""));

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(VaultError::invalid_amount(value, "no digits"));
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(VaultError::invalid_amount(value, "expected a plain decimal numeral"));
        }

        let decimals = decimals as usize;
        let kept = &frac_part[..frac_part.len().min(decimals)];

        let mut digits = String::with_capacity(int_part.len() + decimals);
        digits.push_str(int_part);
        digits.push_str(kept);
        digits.extend(std::iter::repeat_n('0', decimals - kept.len()));

        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(Self::ZERO);
        }

        U256::from_dec_str(digits)
            .map(Self)
            .map_err(|e| VaultError::Overflow(format!("{} does not fit in 256 bits: {:?}", value, e)))
    }

    /// Exact fixed-point to decimal-string conversion, trailing zeros stripped.
    pub fn format_units(&self, decimals: u32) -> String {
        let digits = self.0.to_string();
        let decimals = decimals as usize;
        if decimals == 0 {
            return digits;
        }

        let padded = if digits.len() <= decimals {
            format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
        } else {
            digits
        };

        let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            int_part.to_string()
        } else {
            format!("{}.{}", int_part, frac_part)
        }
    }

    /// Converts to a `Decimal` for ratio math and display.
    ///
    /// Least significant digits are dropped only when the amount would not
    /// fit in a `Decimal` mantissa at full scale.
    pub fn to_decimal(&self, decimals: u32) -> Result<Decimal> {
        if self.0.bits() > 128 {
            return Err(VaultError::Overflow(format!("{} exceeds 128 bits", self.0)));
        }

        let mut mantissa = self.0.low_u128();
        let mut scale = decimals;
        while mantissa > DECIMAL_MAX_MANTISSA && scale > 0 {
            mantissa /= 10;
            scale -= 1;
        }
        if mantissa > DECIMAL_MAX_MANTISSA {
            return Err(VaultError::Overflow(format!("{} exceeds decimal range", self.0)));
        }

        Ok(Decimal::try_from_i128_with_scale(mantissa as i128, scale)?)
    }

    /// `self * (100 - percent) / 100` with floor division.
    pub fn apply_slippage(&self, percent: u32) -> Result<Self> {
        if percent > 100 {
            return Err(VaultError::Config(format!("slippage {}% exceeds 100%", percent)));
        }

        let scaled = self
            .0
            .checked_mul(U256::from(100 - percent))
            .ok_or_else(|| VaultError::Overflow(format!("{} * {}", self.0, 100 - percent)))?;

        Ok(Self(scaled / U256::from(100)))
    }
}

impl From<u64> for Wei {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<u128> for Wei {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Wei {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
