use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Address, TxHash, Wei};

/// Loading/error state of the action currently in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionState {
    pub is_loading: bool,
    pub error: Option<String>,
}

impl TransactionState {
    pub fn pending() -> Self {
        Self {
            is_loading: true,
            error: None,
        }
    }
}

/// Why an action returned before reaching the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// No wallet connected
    NotConnected,
    /// Nothing to approve or deposit
    EmptyAmount,
    /// Mint quote for the current pair has not resolved
    MissingQuote,
    /// Another approval or deposit is still pending
    ActionInFlight,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotConnected => write!(f, "wallet not connected"),
            SkipReason::EmptyAmount => write!(f, "empty amount"),
            SkipReason::MissingQuote => write!(f, "mint quote unavailable"),
            SkipReason::ActionInFlight => write!(f, "another action is pending"),
        }
    }
}

/// Outcome of a single on-chain action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxOutcome {
    /// Wallet returned a transaction hash
    Success(TxHash),
    /// Wallet returned nothing without raising
    Rejected,
    /// Request raised; carries the classified message
    Failed(String),
    /// No request was made
    Skipped(SkipReason),
}

impl TxOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TxOutcome::Success(_))
    }

    pub fn tx_hash(&self) -> Option<&TxHash> {
        match self {
            TxOutcome::Success(hash) => Some(hash),
            _ => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            TxOutcome::Success(hash) => format!("SUCCESS: tx {}", hash.short()),
            TxOutcome::Rejected => "REJECTED: wallet returned no transaction".to_string(),
            TxOutcome::Failed(message) => format!("FAILED: {}", message),
            TxOutcome::Skipped(reason) => format!("SKIPPED: {}", reason),
        }
    }
}

/// Parameter struct of the router's `addLiquidity` entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLiquidityData {
    pub amount0_max: Wei,
    pub amount1_max: Wei,
    pub amount0_min: Wei,
    pub amount1_min: Wei,
    pub amount_shares_min: Wei,
    pub vault: Address,
    pub receiver: Address,
    pub gauge: Address,
}

/// Contract function invoked by a write request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractCall {
    /// ERC-20 `approve(spender, amount)`
    Approve { spender: Address, amount: Wei },
    /// Router `addLiquidity(AddLiquidityData)`
    AddLiquidity(AddLiquidityData),
}

impl ContractCall {
    pub fn function_name(&self) -> &'static str {
        match self {
            ContractCall::Approve { .. } => "approve",
            ContractCall::AddLiquidity(_) => "addLiquidity",
        }
    }
}

/// A state-changing call sent through the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRequest {
    pub address: Address,
    pub call: ContractCall,
}

impl WriteRequest {
    pub fn approve(token: Address, spender: Address, amount: Wei) -> Self {
        Self {
            address: token,
            call: ContractCall::Approve { spender, amount },
        }
    }

    pub fn add_liquidity(router: Address, data: AddLiquidityData) -> Self {
        Self {
            address: router,
            call: ContractCall::AddLiquidity(data),
        }
    }
}

impl fmt::Display for WriteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.call.function_name(), self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let success = TxOutcome::Success(TxHash::new("0xfeedbeef00"));
        assert!(success.is_success());
        assert_eq!(success.tx_hash().map(|h| h.as_str()), Some("0xfeedbeef00"));

        assert!(!TxOutcome::Rejected.is_success());
        assert!(TxOutcome::Failed("boom".into()).tx_hash().is_none());
        assert!(!TxOutcome::Skipped(SkipReason::EmptyAmount).is_success());
    }

    #[test]
    fn test_add_liquidity_data_uses_router_field_names() {
        let data = AddLiquidityData {
            amount0_max: Wei::from(10u64),
            amount1_max: Wei::from(20u64),
            amount0_min: Wei::from(9u64),
            amount1_min: Wei::from(19u64),
            amount_shares_min: Wei::from(5u64),
            vault: Address::ZERO,
            receiver: Address::ZERO,
            gauge: Address::ZERO,
        };
        let json = serde_json::to_value(&data).unwrap();
        for key in [
            "amount0Max",
            "amount1Max",
            "amount0Min",
            "amount1Min",
            "amountSharesMin",
            "vault",
            "receiver",
            "gauge",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
