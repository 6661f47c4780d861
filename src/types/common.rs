use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{Result, VaultError};

pub type Timestamp = u64;

pub fn now() -> Timestamp {
    chrono::Utc::now().timestamp_millis() as u64
}

/// Slippage tolerance applied to every deposit, in whole percent.
pub const SLIPPAGE_PERCENT: u32 = 5;

/// Both vault tokens use 18-decimal fixed-point amounts.
pub const TOKEN_DECIMALS: u32 = 18;

/// Default fractional digits kept from user input.
pub const MAX_INPUT_DECIMALS: usize = 18;

/// Fractional digits shown for balances and minimum-received previews.
pub const DISPLAY_DECIMALS: u32 = 5;

// ============================================================================
// Address
// ============================================================================

/// 20-byte EVM account or contract address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// The zero address, used as the "no gauge" sentinel.
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != 40 {
            return Err(VaultError::Parse(format!(
                "invalid address '{}': expected 40 hex digits, got {}",
                s,
                digits.len()
            )));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| VaultError::Parse(format!("invalid address '{}': {}", s, e)))?;

        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = VaultError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ============================================================================
// Transaction hash
// ============================================================================

/// Identifier returned by the wallet for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First ten characters, enough to recognise the hash in a notification.
    pub fn short(&self) -> &str {
        self.0.get(..10).unwrap_or(&self.0)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Token
// ============================================================================

/// One side of the vault pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub address: Address,
    pub decimals: u32,
}

impl TokenInfo {
    pub fn new(symbol: impl Into<String>, address: Address, decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            address,
            decimals,
        }
    }
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WETH: &str = "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1";

    #[test]
    fn test_address_parse_and_display() {
        let address: Address = WETH.parse().unwrap();
        assert_eq!(address.to_string(), WETH.to_lowercase());
    }

    #[test]
    fn test_address_without_prefix() {
        let address: Address = WETH.trim_start_matches("0x").parse().unwrap();
        assert_eq!(address, WETH.parse().unwrap());
    }

    #[test]
    fn test_address_rejects_bad_length() {
        assert!("0x1234".parse::<Address>().is_err());
    }

    #[test]
    fn test_address_rejects_non_hex() {
        let bad = format!("0x{}", "zz".repeat(20));
        assert!(bad.parse::<Address>().is_err());
    }

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert_eq!(
            Address::ZERO.to_string(),
            "0x0000000000000000000000000000000000000000"
        );
        assert!(!WETH.parse::<Address>().unwrap().is_zero());
    }

    #[test]
    fn test_address_serde_as_hex_string() {
        let address: Address = WETH.parse().unwrap();
        let serialized = serde_json::to_string(&address).unwrap();
        assert_eq!(serialized, format!("\"{}\"", WETH.to_lowercase()));

        let deserialized: Address = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, address);
    }

    #[test]
    fn test_tx_hash_short() {
        let hash = TxHash::new("0xabcdef0123456789");
        assert_eq!(hash.short(), "0xabcdef01");
        assert_eq!(TxHash::new("0x12").short(), "0x12");
    }
}
