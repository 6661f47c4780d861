use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    client::{CallFailure, ChainWriter},
    execution::classifier::{FailureKind, classify_failure},
    types::{
        AddLiquidityData, Address, DepositPair, MintQuote, Result, SkipReason,
        TransactionState, TxOutcome, Wei, WriteRequest,
    },
    utils::config::DepositConfig,
};

pub const APPROVE_FALLBACK: &str = "Failed to approve token";
pub const ADD_LIQUIDITY_FALLBACK: &str = "Failed to add liquidity";
pub const MISSING_QUOTE_MESSAGE: &str = "Unable to calculate liquidity amounts. Please try again.";

/// Runs approvals and the liquidity deposit against the router.
///
/// At most one action is in flight at a time; a second call while one is
/// pending returns `Skipped(ActionInFlight)` and leaves state untouched.
pub struct TransactionOrchestrator {
    writer: Arc<dyn ChainWriter>,
    router: Address,
    vault: Address,
    config: DepositConfig,
    state: watch::Sender<TransactionState>,
    in_flight: AtomicBool,
}

/// Holds the single-flight slot; releasing it also ends the loading state,
/// including when the action future is dropped mid-write.
struct FlightGuard<'a> {
    in_flight: &'a AtomicBool,
    state: &'a watch::Sender<TransactionState>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|state| state.is_loading = false);
        self.in_flight.store(false, Ordering::Release);
    }
}

impl TransactionOrchestrator {
    pub fn new(
        writer: Arc<dyn ChainWriter>,
        router: Address,
        vault: Address,
        config: DepositConfig,
    ) -> Self {
        let (state, _) = watch::channel(TransactionState::default());
        Self {
            writer,
            router,
            vault,
            config,
            state,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> TransactionState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Read-only view of the state for the presentation layer.
    pub fn subscribe(&self) -> watch::Receiver<TransactionState> {
        self.state.subscribe()
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|state| state.error = None);
    }

    /// Grants the router an allowance of `amount` (display units) on `token`.
    pub async fn approve_token(
        &self,
        account: Option<&Address>,
        token: Address,
        amount: &str,
    ) -> TxOutcome {
        if account.is_none() {
            return self.skip(SkipReason::NotConnected);
        }
        if amount.is_empty() {
            return self.skip(SkipReason::EmptyAmount);
        }
        let Some(_guard) = self.begin() else {
            return self.skip(SkipReason::ActionInFlight);
        };

        info!("Approving {} of {} for router {}", amount, token, self.router);

        let outcome = match Wei::parse_units(amount, self.config.token_decimals) {
            Ok(allowance) => {
                let request = WriteRequest::approve(token, self.router, allowance);
                self.submit(request, APPROVE_FALLBACK).await
            }
            Err(e) => self.fail(CallFailure::from(e), APPROVE_FALLBACK),
        };

        outcome
    }

    /// Deposits the pair through the router with slippage-bounded minimums.
    pub async fn add_liquidity(
        &self,
        receiver: Option<&Address>,
        pair: &DepositPair,
        quote: Option<&MintQuote>,
    ) -> TxOutcome {
        let Some(receiver) = receiver else {
            return self.skip(SkipReason::NotConnected);
        };
        if self.in_flight.load(Ordering::Acquire) {
            return self.skip(SkipReason::ActionInFlight);
        }
        let Some(quote) = quote else {
            warn!("Add liquidity requested before the mint quote resolved");
            self.state
                .send_modify(|state| state.error = Some(MISSING_QUOTE_MESSAGE.to_string()));
            return TxOutcome::Skipped(SkipReason::MissingQuote);
        };
        let Some(_guard) = self.begin() else {
            return self.skip(SkipReason::ActionInFlight);
        };

        info!(
            "Adding liquidity: {} / {} into vault {}",
            pair.token0_amount, pair.token1_amount, self.vault
        );

        let outcome = match self.build_deposit(*receiver, pair, quote) {
            Ok(data) => {
                debug!(
                    "addLiquidity max {}/{} min {}/{} shares >= {}",
                    data.amount0_max,
                    data.amount1_max,
                    data.amount0_min,
                    data.amount1_min,
                    data.amount_shares_min
                );
                let request = WriteRequest::add_liquidity(self.router, data);
                self.submit(request, ADD_LIQUIDITY_FALLBACK).await
            }
            Err(e) => self.fail(CallFailure::from(e), ADD_LIQUIDITY_FALLBACK),
        };

        outcome
    }

    /// Router parameters for the current pair; all math is fixed-point.
    pub fn build_deposit(
        &self,
        receiver: Address,
        pair: &DepositPair,
        quote: &MintQuote,
    ) -> Result<AddLiquidityData> {
        let decimals = self.config.token_decimals;
        let slippage = self.config.slippage_percent;

        let amount0_max = Wei::parse_units(&pair.token0_amount, decimals)?;
        let amount1_max = Wei::parse_units(&pair.token1_amount, decimals)?;

        Ok(AddLiquidityData {
            amount0_max,
            amount1_max,
            amount0_min: amount0_max.apply_slippage(slippage)?,
            amount1_min: amount1_max.apply_slippage(slippage)?,
            amount_shares_min: quote.min_shares,
            vault: self.vault,
            receiver,
            gauge: Address::ZERO,
        })
    }

    fn begin(&self) -> Option<FlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;

        self.state.send_replace(TransactionState::pending());
        Some(FlightGuard {
            in_flight: &self.in_flight,
            state: &self.state,
        })
    }

    async fn submit(&self, request: WriteRequest, fallback: &str) -> TxOutcome {
        let timeout = self.config.write_timeout();
        let description = request.to_string();

        match tokio::time::timeout(timeout, self.writer.write(request)).await {
            Ok(Ok(Some(hash))) => {
                info!("{} submitted: {}", description, hash);
                TxOutcome::Success(hash)
            }
            Ok(Ok(None)) => {
                info!("{} returned no transaction, treating as rejected", description);
                TxOutcome::Rejected
            }
            Ok(Err(failure)) => self.fail(failure, fallback),
            Err(_) => {
                let failure = CallFailure::message(format!(
                    "request timed out after {}s",
                    timeout.as_secs()
                ));
                self.fail(failure, fallback)
            }
        }
    }

    fn fail(&self, failure: CallFailure, fallback: &str) -> TxOutcome {
        let message = classify_failure(Some(&failure), fallback);
        match FailureKind::of(&failure) {
            FailureKind::UserRejected => warn!("{}: {}", message, failure),
            _ => error!("{}: {}", message, failure),
        }

        self.state.send_modify(|state| state.error = Some(message.clone()));
        TxOutcome::Failed(message)
    }

    fn skip(&self, reason: SkipReason) -> TxOutcome {
        debug!("Action skipped: {}", reason);
        TxOutcome::Skipped(reason)
    }

}
