use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    client::{ChainReader, ChainWriter, Query},
    deposit::RatioEngine,
    execution::TransactionOrchestrator,
    types::{
        ActiveField, Address, DepositPair, MintQuote, PoolReserves, TransactionState, TxOutcome,
        WalletBalances, Wei,
    },
    utils::config::{Config, ContractsConfig, DepositConfig},
};

/// Everything the presentation layer reads, as one serializable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    pub token0: Address,
    pub token1: Address,
    pub reserves: Option<PoolReserves>,
    pub balances: WalletBalances,
    pub deposit_token0: String,
    pub deposit_token1: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Session state for one vault deposit screen.
///
/// Owns the deposit pair, the latest reads and the orchestrator. Views get
/// snapshots and call the methods here; they never mutate state directly.
pub struct ContractContext {
    contracts: ContractsConfig,
    deposit: DepositConfig,
    reader: Arc<dyn ChainReader>,
    orchestrator: TransactionOrchestrator,
    account: Option<Address>,
    engine: RatioEngine,
    reserves: Query<PoolReserves>,
    balance0: Query<Wei>,
    balance1: Query<Wei>,
    quote: Query<MintQuote>,
}

impl ContractContext {
    pub fn new(config: &Config, reader: Arc<dyn ChainReader>, writer: Arc<dyn ChainWriter>) -> Self {
        let contracts = config.contracts.clone();
        let deposit = config.deposit.clone();
        let orchestrator = TransactionOrchestrator::new(
            writer,
            contracts.router,
            contracts.vault,
            deposit.clone(),
        );

        Self {
            engine: RatioEngine::new(deposit.max_input_decimals),
            contracts,
            deposit,
            reader,
            orchestrator,
            account: None,
            reserves: Query::loading(),
            balance0: Query::empty(),
            balance1: Query::empty(),
            quote: Query::empty(),
        }
    }

    // ========== ACCOUNT ==========

    pub fn connect(&mut self, address: Address) {
        info!("Wallet connected: {}", address);
        self.account = Some(address);
        self.balance0 = Query::loading();
        self.balance1 = Query::loading();
    }

    pub fn disconnect(&mut self) {
        info!("Wallet disconnected");
        self.account = None;
        self.balance0 = Query::empty();
        self.balance1 = Query::empty();
    }

    pub fn account(&self) -> Option<&Address> {
        self.account.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    // ========== READ STATE ==========

    pub fn token0(&self) -> Address {
        self.contracts.token0
    }

    pub fn token1(&self) -> Address {
        self.contracts.token1
    }

    pub fn contracts(&self) -> &ContractsConfig {
        &self.contracts
    }

    pub fn deposit_config(&self) -> &DepositConfig {
        &self.deposit
    }

    pub fn reserves(&self) -> Option<&PoolReserves> {
        self.reserves.as_ref()
    }

    pub fn balances(&self) -> WalletBalances {
        let decimals = self.deposit.token_decimals;
        WalletBalances {
            token0: self.balance0.as_ref().map(|b| b.format_units(decimals)),
            token1: self.balance1.as_ref().map(|b| b.format_units(decimals)),
        }
    }

    pub fn quote(&self) -> Option<&MintQuote> {
        self.quote.as_ref()
    }

    pub fn deposit_pair(&self) -> &DepositPair {
        self.engine.pair()
    }

    pub fn deposit_token0(&self) -> &str {
        &self.engine.pair().token0_amount
    }

    pub fn deposit_token1(&self) -> &str {
        &self.engine.pair().token1_amount
    }

    /// True while any required read or an action is pending.
    pub fn is_loading(&self) -> bool {
        self.reserves.is_loading
            || self.balance0.is_loading
            || self.balance1.is_loading
            || self.orchestrator.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.orchestrator.error()
    }

    pub fn dismiss_error(&self) {
        self.orchestrator.clear_error();
    }

    pub fn subscribe(&self) -> watch::Receiver<TransactionState> {
        self.orchestrator.subscribe()
    }

    pub fn orchestrator(&self) -> &TransactionOrchestrator {
        &self.orchestrator
    }

    pub fn snapshot(&self) -> ContractSnapshot {
        ContractSnapshot {
            token0: self.token0(),
            token1: self.token1(),
            reserves: self.reserves().copied(),
            balances: self.balances(),
            deposit_token0: self.deposit_token0().to_string(),
            deposit_token1: self.deposit_token1().to_string(),
            is_loading: self.is_loading(),
            error: self.error(),
        }
    }

    // ========== DEPOSIT INPUT ==========

    pub fn update_token0(&mut self, value: &str) {
        self.update(ActiveField::Token0, value);
    }

    pub fn update_token1(&mut self, value: &str) {
        self.update(ActiveField::Token1, value);
    }

    pub fn update(&mut self, field: ActiveField, value: &str) {
        let before = self.engine.pair().clone();
        self.engine.update(field, value);
        self.invalidate_quote_if_changed(&before);
    }

    pub fn clear_deposits(&mut self) {
        self.engine.clear();
        self.quote = Query::empty();
    }

    // ========== EXTERNAL READS ==========

    /// Replaces the reserves read; the paired field re-derives immediately.
    pub fn set_reserves(&mut self, reserves: Query<PoolReserves>) {
        let before = self.engine.pair().clone();
        self.engine.set_reserves(reserves.data);
        self.reserves = reserves;
        self.invalidate_quote_if_changed(&before);
    }

    pub fn set_balances(&mut self, balance0: Query<Wei>, balance1: Query<Wei>) {
        self.balance0 = balance0;
        self.balance1 = balance1;
    }

    pub fn set_quote(&mut self, quote: Query<MintQuote>) {
        self.quote = quote;
    }

    /// Re-reads reserves, balances and the mint quote, in that order.
    pub async fn refresh(&mut self) {
        self.refresh_reserves().await;
        self.refresh_balances().await;
        self.refresh_quote().await;
    }

    pub async fn refresh_reserves(&mut self) {
        let decimals = self.deposit.token_decimals;
        let result = self
            .reader
            .total_underlying(&self.contracts.helper, &self.contracts.vault)
            .await
            .and_then(|(amount0, amount1)| PoolReserves::from_raw(amount0, amount1, decimals));

        match &result {
            Ok(reserves) => debug!("Reserves: {} / {}", reserves.amount0, reserves.amount1),
            Err(e) => warn!("Failed to read vault reserves: {}", e),
        }
        self.set_reserves(Query::from_result(result));
    }

    pub async fn refresh_balances(&mut self) {
        let Some(owner) = self.account else {
            self.set_balances(Query::empty(), Query::empty());
            return;
        };

        let balance0 = self.reader.balance_of(&self.contracts.token0, &owner).await;
        let balance1 = self.reader.balance_of(&self.contracts.token1, &owner).await;
        for (symbol, result) in [
            (&self.contracts.token0_symbol, &balance0),
            (&self.contracts.token1_symbol, &balance1),
        ] {
            if let Err(e) = result {
                warn!("Failed to read {} balance: {}", symbol, e);
            }
        }

        self.set_balances(Query::from_result(balance0), Query::from_result(balance1));
    }

    /// Only queries the resolver when both deposit amounts are positive.
    pub async fn refresh_quote(&mut self) {
        let Some((amount0, amount1)) = self.quote_amounts() else {
            self.quote = Query::empty();
            return;
        };

        let result = self
            .reader
            .get_mint_amounts(&self.contracts.resolver, &self.contracts.vault, amount0, amount1)
            .await;

        match &result {
            Ok(quote) => debug!("Mint quote: min shares {}", quote.min_shares),
            Err(e) => warn!("Failed to quote mint amounts: {}", e),
        }
        self.quote = Query::from_result(result);
    }

    // ========== ACTIONS ==========

    pub async fn approve_token0(&self) -> TxOutcome {
        self.orchestrator
            .approve_token(self.account.as_ref(), self.contracts.token0, self.deposit_token0())
            .await
    }

    pub async fn approve_token1(&self) -> TxOutcome {
        self.orchestrator
            .approve_token(self.account.as_ref(), self.contracts.token1, self.deposit_token1())
            .await
    }

    /// Submits the deposit; on success both fields reset to empty.
    pub async fn add_liquidity(&mut self) -> TxOutcome {
        let outcome = self
            .orchestrator
            .add_liquidity(self.account.as_ref(), self.engine.pair(), self.quote.as_ref())
            .await;

        if outcome.is_success() {
            self.clear_deposits();
        }
        outcome
    }

    fn quote_amounts(&self) -> Option<(Wei, Wei)> {
        let pair = self.engine.pair();
        if !pair.is_complete() {
            return None;
        }

        let decimals = self.deposit.token_decimals;
        let amount0 = Wei::parse_units(&pair.token0_amount, decimals).ok()?;
        let amount1 = Wei::parse_units(&pair.token1_amount, decimals).ok()?;
        (!amount0.is_zero() && !amount1.is_zero()).then_some((amount0, amount1))
    }

    fn invalidate_quote_if_changed(&mut self, before: &DepositPair) {
        let pair = self.engine.pair();
        if pair.token0_amount == before.token0_amount && pair.token1_amount == before.token1_amount {
            return;
        }

        self.quote = if self.quote_amounts().is_some() {
            Query::loading()
        } else {
            Query::empty()
        };
    }
}
