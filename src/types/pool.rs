use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Result, Timestamp, VaultError, Wei, now};

/// Vault holdings of token0 and token1 in display units.
///
/// Replaced wholesale on every refresh, never edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReserves {
    pub amount0: Decimal,
    pub amount1: Decimal,
}

impl PoolReserves {
    pub fn new(amount0: Decimal, amount1: Decimal) -> Result<Self> {
        if amount0.is_sign_negative() || amount1.is_sign_negative() {
            return Err(VaultError::invalid_amount(
                format!("{}/{}", amount0, amount1),
                "reserves cannot be negative",
            ));
        }
        Ok(Self { amount0, amount1 })
    }

    /// Builds reserves from the raw `totalUnderlying` read.
    pub fn from_raw(amount0: Wei, amount1: Wei, decimals: u32) -> Result<Self> {
        Self::new(amount0.to_decimal(decimals)?, amount1.to_decimal(decimals)?)
    }

    /// token1 per token0, undefined when the vault holds no token0.
    pub fn ratio(&self) -> Option<Decimal> {
        if self.amount0.is_zero() {
            return None;
        }
        self.amount1.checked_div(self.amount0)
    }
}

/// Connected wallet's holdings, as formatted decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalances {
    pub token0: Option<String>,
    pub token1: Option<String>,
}

/// Resolver preview of the shares minted for the current deposit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintQuote {
    pub amount0: Wei,
    pub amount1: Wei,
    pub min_shares: Wei,
    pub quoted_at: Timestamp,
}

impl MintQuote {
    pub fn new(amount0: Wei, amount1: Wei, min_shares: Wei) -> Self {
        Self {
            amount0,
            amount1,
            min_shares,
            quoted_at: now(),
        }
    }

    pub fn age_ms(&self) -> u64 {
        now().saturating_sub(self.quoted_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reserves_ratio() {
        let reserves = PoolReserves::new(dec!(1), dec!(2)).unwrap();
        assert_eq!(reserves.ratio(), Some(dec!(2)));

        let reserves = PoolReserves::new(dec!(2), dec!(1)).unwrap();
        assert_eq!(reserves.ratio(), Some(dec!(0.5)));
    }

    #[test]
    fn test_reserves_ratio_undefined_without_token0() {
        let reserves = PoolReserves::new(Decimal::ZERO, dec!(3)).unwrap();
        assert_eq!(reserves.ratio(), None);
    }

    #[test]
    fn test_reserves_reject_negative() {
        assert!(PoolReserves::new(dec!(-1), dec!(1)).is_err());
    }

    #[test]
    fn test_reserves_from_raw() {
        let reserves = PoolReserves::from_raw(
            Wei::from(1_000_000_000_000_000_000u64),
            Wei::from(2_000_000_000_000_000_000u64),
            18,
        )
        .unwrap();
        assert_eq!(reserves.amount0, dec!(1));
        assert_eq!(reserves.amount1, dec!(2));
    }
}
