use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::{
    client::chain::{CallFailure, ChainReader, ChainWriter},
    types::{Address, MintQuote, Result, TxHash, VaultError, Wei, WriteRequest},
};

type WriteResponse = std::result::Result<Option<TxHash>, CallFailure>;

/// Scripted chain for tests: records every write and replays queued answers.
#[derive(Default)]
pub struct MockChain {
    pub reserves: Option<(Wei, Wei)>,
    pub balances: HashMap<Address, Wei>,
    pub quote: Option<MintQuote>,
    pub write_delay: Option<Duration>,
    pub hang_writes: bool,
    responses: Mutex<VecDeque<WriteResponse>>,
    requests: Mutex<Vec<WriteRequest>>,
    quote_calls: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reserves(mut self, amount0: Wei, amount1: Wei) -> Self {
        self.reserves = Some((amount0, amount1));
        self
    }

    pub fn with_balance(mut self, token: Address, amount: Wei) -> Self {
        self.balances.insert(token, amount);
        self
    }

    pub fn with_quote(mut self, quote: MintQuote) -> Self {
        self.quote = Some(quote);
        self
    }

    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    pub fn hanging(mut self) -> Self {
        self.hang_writes = true;
        self
    }

    pub fn push_response(&self, response: WriteResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<WriteRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn quote_calls(&self) -> usize {
        self.quote_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn total_underlying(&self, _helper: &Address, _vault: &Address) -> Result<(Wei, Wei)> {
        self.reserves
            .ok_or_else(|| VaultError::read("totalUnderlying", "execution reverted"))
    }

    async fn balance_of(&self, token: &Address, _owner: &Address) -> Result<Wei> {
        self.balances
            .get(token)
            .copied()
            .ok_or_else(|| VaultError::read("balanceOf", "unknown token"))
    }

    async fn get_mint_amounts(
        &self,
        _resolver: &Address,
        _vault: &Address,
        _amount0_max: Wei,
        _amount1_max: Wei,
    ) -> Result<MintQuote> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.quote
            .ok_or_else(|| VaultError::read("getMintAmounts", "execution reverted"))
    }
}

#[async_trait]
impl ChainWriter for MockChain {
    async fn write(&self, request: WriteRequest) -> WriteResponse {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };

        if self.hang_writes {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Some(TxHash::new(format!("0xmock{:04}", index)))))
    }
}
