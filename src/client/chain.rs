use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Address, MintQuote, Result, TxHash, VaultError, Wei, WriteRequest};

/// Read-only contract queries used by the deposit flow.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Helper `totalUnderlying(vault)`: raw vault holdings of token0 and token1.
    async fn total_underlying(&self, helper: &Address, vault: &Address) -> Result<(Wei, Wei)>;

    /// ERC-20 `balanceOf(owner)`.
    async fn balance_of(&self, token: &Address, owner: &Address) -> Result<Wei>;

    /// Resolver `getMintAmounts(vault, amount0Max, amount1Max)`.
    async fn get_mint_amounts(
        &self,
        resolver: &Address,
        vault: &Address,
        amount0_max: Wei,
        amount1_max: Wei,
    ) -> Result<MintQuote>;
}

/// Wallet-signed state-changing calls.
///
/// `Ok(None)` means the wallet came back without a transaction and without
/// raising, which callers treat as a silent rejection.
#[async_trait]
pub trait ChainWriter: Send + Sync {
    async fn write(&self, request: WriteRequest) -> std::result::Result<Option<TxHash>, CallFailure>;
}

/// Failure raised by a wallet or node while handling a write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFailure {
    /// Short machine-readable reason, e.g. `"rejected"`
    pub reason: Option<String>,
    /// Free-form message from the wallet or node
    pub message: Option<String>,
}

impl CallFailure {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            reason: None,
            message: Some(message.into()),
        }
    }

    pub fn reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            message: None,
        }
    }

    pub fn rejected() -> Self {
        Self::reason("rejected")
    }
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.reason, &self.message) {
            (Some(reason), Some(message)) => write!(f, "{}: {}", reason, message),
            (Some(reason), None) => write!(f, "{}", reason),
            (None, Some(message)) => write!(f, "{}", message),
            (None, None) => write!(f, "unknown failure"),
        }
    }
}

impl std::error::Error for CallFailure {}

impl From<VaultError> for CallFailure {
    fn from(err: VaultError) -> Self {
        Self::message(err.to_string())
    }
}

/// Result of a cached read: the value if resolved, plus an in-flight flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query<T> {
    pub data: Option<T>,
    pub is_loading: bool,
}

impl<T> Query<T> {
    pub fn loading() -> Self {
        Self {
            data: None,
            is_loading: true,
        }
    }

    pub fn ready(data: T) -> Self {
        Self {
            data: Some(data),
            is_loading: false,
        }
    }

    /// Settled without data: disabled, failed, or not applicable.
    pub fn empty() -> Self {
        Self {
            data: None,
            is_loading: false,
        }
    }

    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ready(data),
            Err(_) => Self::empty(),
        }
    }

    pub fn as_ref(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self::loading()
    }
}
