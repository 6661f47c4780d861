use async_trait::async_trait;
use primitive_types::U256;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::{
    client::chain::{CallFailure, ChainReader, ChainWriter},
    types::{Address, ContractCall, MintQuote, Result, TxHash, VaultError, Wei, WriteRequest},
};

/// In-memory stand-in for the vault contracts and the wallet.
///
/// Reads answer from fixed reserves and balances; writes are logged and
/// acknowledged with synthetic hashes. Deposits above the receiver's
/// balance fail the way a node would.
pub struct DryRunClient {
    reserves: (Wei, Wei),
    total_supply: Wei,
    token0: Address,
    token1: Address,
    balances: HashMap<(Address, Address), Wei>,
    writes: AtomicU64,
}

impl DryRunClient {
    pub fn new(token0: Address, token1: Address, reserves: (Wei, Wei), total_supply: Wei) -> Self {
        info!(
            "Dry-run chain: reserves {}/{}, supply {}",
            reserves.0, reserves.1, total_supply
        );
        Self {
            reserves,
            total_supply,
            token0,
            token1,
            balances: HashMap::new(),
            writes: AtomicU64::new(0),
        }
    }

    pub fn with_balance(mut self, token: Address, owner: Address, amount: Wei) -> Self {
        self.balances.insert((token, owner), amount);
        self
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    fn balance(&self, token: &Address, owner: &Address) -> Wei {
        self.balances
            .get(&(*token, *owner))
            .copied()
            .unwrap_or(Wei::ZERO)
    }

    fn shares_for(&self, amount: Wei, reserve: Wei) -> Result<U256> {
        amount
            .raw()
            .checked_mul(self.total_supply.raw())
            .map(|product| product / reserve.raw())
            .ok_or_else(|| VaultError::Overflow(format!("{} * {}", amount, self.total_supply)))
    }

    fn next_hash(&self) -> TxHash {
        let nonce = self.writes.fetch_add(1, Ordering::Relaxed) + 1;
        TxHash::new(format!("0x{:064x}", nonce))
    }
}

#[async_trait]
impl ChainReader for DryRunClient {
    async fn total_underlying(&self, _helper: &Address, vault: &Address) -> Result<(Wei, Wei)> {
        debug!("totalUnderlying({})", vault);
        Ok(self.reserves)
    }

    async fn balance_of(&self, token: &Address, owner: &Address) -> Result<Wei> {
        Ok(self.balance(token, owner))
    }

    async fn get_mint_amounts(
        &self,
        _resolver: &Address,
        vault: &Address,
        amount0_max: Wei,
        amount1_max: Wei,
    ) -> Result<MintQuote> {
        debug!("getMintAmounts({}, {}, {})", vault, amount0_max, amount1_max);
        let (reserve0, reserve1) = self.reserves;

        let mint = match (reserve0.is_zero(), reserve1.is_zero()) {
            (true, true) => {
                return Err(VaultError::read("getMintAmounts", "vault holds no liquidity"));
            }
            (true, false) => self.shares_for(amount1_max, reserve1)?,
            (false, true) => self.shares_for(amount0_max, reserve0)?,
            (false, false) => self
                .shares_for(amount0_max, reserve0)?
                .min(self.shares_for(amount1_max, reserve1)?),
        };

        let used = |reserve: Wei| -> Result<Wei> {
            mint.checked_mul(reserve.raw())
                .map(|product| Wei::new(product / self.total_supply.raw().max(U256::one())))
                .ok_or_else(|| VaultError::Overflow(format!("{} * {}", mint, reserve)))
        };

        Ok(MintQuote::new(used(reserve0)?, used(reserve1)?, Wei::new(mint)))
    }
}

#[async_trait]
impl ChainWriter for DryRunClient {
    async fn write(&self, request: WriteRequest) -> std::result::Result<Option<TxHash>, CallFailure> {
        if let ContractCall::AddLiquidity(data) = &request.call {
            let short0 = self.balance(&self.token0, &data.receiver) < data.amount0_max;
            let short1 = self.balance(&self.token1, &data.receiver) < data.amount1_max;
            if short0 || short1 {
                return Err(CallFailure::message(
                    "insufficient funds for transfer: amount exceeds balance",
                ));
            }
        }

        let hash = self.next_hash();
        info!("[dry-run] {} -> {}", request, hash.short());
        Ok(Some(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AddLiquidityData;

    const E18: u64 = 1_000_000_000_000_000_000;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn client() -> DryRunClient {
        DryRunClient::new(
            addr(1),
            addr(2),
            (Wei::from(E18), Wei::from(2 * E18)),
            Wei::from(E18),
        )
        .with_balance(addr(1), addr(9), Wei::from(E18))
        .with_balance(addr(2), addr(9), Wei::from(E18))
    }

    #[tokio::test]
    async fn test_reads() {
        let client = client();
        let (r0, r1) = client.total_underlying(&addr(3), &addr(4)).await.unwrap();
        assert_eq!(r0, Wei::from(E18));
        assert_eq!(r1, Wei::from(2 * E18));

        assert_eq!(client.balance_of(&addr(1), &addr(9)).await.unwrap(), Wei::from(E18));
        assert_eq!(client.balance_of(&addr(1), &addr(8)).await.unwrap(), Wei::ZERO);
    }

    #[tokio::test]
    async fn test_mint_amounts_take_the_smaller_side() {
        let client = client();
        let quote = client
            .get_mint_amounts(&addr(5), &addr(4), Wei::from(E18 / 10), Wei::from(E18))
            .await
            .unwrap();

        // token0 is the binding side: 0.1 of reserves -> 0.1 of supply
        assert_eq!(quote.min_shares, Wei::from(E18 / 10));
        assert_eq!(quote.amount0, Wei::from(E18 / 10));
        assert_eq!(quote.amount1, Wei::from(2 * E18 / 10));
    }

    #[tokio::test]
    async fn test_writes_return_sequential_hashes() {
        let client = client();
        let request = WriteRequest::approve(addr(1), addr(6), Wei::from(1u64));

        let first = client.write(request.clone()).await.unwrap().unwrap();
        let second = client.write(request).await.unwrap().unwrap();

        assert_ne!(first, second);
        assert_eq!(client.write_count(), 2);
    }

    #[tokio::test]
    async fn test_add_liquidity_over_balance_fails() {
        let client = client();
        let data = AddLiquidityData {
            amount0_max: Wei::from(2 * E18),
            amount1_max: Wei::from(E18),
            amount0_min: Wei::ZERO,
            amount1_min: Wei::ZERO,
            amount_shares_min: Wei::ZERO,
            vault: addr(4),
            receiver: addr(9),
            gauge: Address::ZERO,
        };

        let failure = client
            .write(WriteRequest::add_liquidity(addr(6), data))
            .await
            .unwrap_err();
        assert!(failure.message.unwrap().contains("insufficient funds"));
        assert_eq!(client.write_count(), 0);
    }
}
