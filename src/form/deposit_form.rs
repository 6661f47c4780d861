use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use tracing::{error, info, warn};

use crate::{
    context::ContractContext,
    types::{ActiveField, TxHash, TxOutcome},
    utils::formatters::{format_for_display, parse_decimal},
};

/// Step of the submit sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStep {
    ApproveToken0,
    ApproveToken1,
    AddLiquidity,
}

impl fmt::Display for SubmitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitStep::ApproveToken0 => write!(f, "approve token0"),
            SubmitStep::ApproveToken1 => write!(f, "approve token1"),
            SubmitStep::AddLiquidity => write!(f, "add liquidity"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositReceipt {
    pub tx_hash: TxHash,
    pub amount0: String,
    pub amount1: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Submit was not eligible; nothing was sent
    NotReady,
    Deposited(DepositReceipt),
    Aborted { step: SubmitStep, outcome: TxOutcome },
}

impl SubmitOutcome {
    pub fn is_deposited(&self) -> bool {
        matches!(self, SubmitOutcome::Deposited(_))
    }

    /// Success banner text, if the deposit went through.
    pub fn notification(&self) -> Option<String> {
        match self {
            SubmitOutcome::Deposited(receipt) => Some(format!(
                "Deposit submitted: {} + {} (tx {})",
                receipt.amount0,
                receipt.amount1,
                receipt.tx_hash.short()
            )),
            _ => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            SubmitOutcome::NotReady => "NOT READY: submit disabled".to_string(),
            SubmitOutcome::Deposited(receipt) => format!(
                "DEPOSITED: {} / {} at {}",
                receipt.amount0,
                receipt.amount1,
                receipt.submitted_at.to_rfc3339()
            ),
            SubmitOutcome::Aborted { step, outcome } => {
                format!("ABORTED at {}: {}", step, outcome.summary())
            }
        }
    }
}

/// Deposit screen logic on top of a [`ContractContext`].
///
/// Holds no state of its own; every value shown comes from the context.
pub struct DepositForm<'a> {
    context: &'a mut ContractContext,
}

impl<'a> DepositForm<'a> {
    pub fn new(context: &'a mut ContractContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ContractContext {
        &*self.context
    }

    pub fn handle_input(&mut self, field: ActiveField, raw: &str) {
        self.context.update(field, raw);
    }

    /// Fills `field` with the full wallet balance, if known.
    pub fn use_max(&mut self, field: ActiveField) {
        let balances = self.context.balances();
        let balance = match field {
            ActiveField::Token0 => balances.token0,
            ActiveField::Token1 => balances.token1,
        };

        if let Some(balance) = balance {
            self.context.update(field, &balance);
        }
    }

    pub fn balance_display(&self, field: ActiveField) -> String {
        let balances = self.context.balances();
        let balance = match field {
            ActiveField::Token0 => balances.token0,
            ActiveField::Token1 => balances.token1,
        };
        let amount = balance
            .as_deref()
            .and_then(parse_decimal)
            .unwrap_or(Decimal::ZERO);

        format_for_display(amount, self.context.deposit_config().display_decimals)
    }

    /// Amount left after slippage, formatted for display; `"0"` when empty.
    pub fn min_received(&self, field: ActiveField) -> String {
        let config = self.context.deposit_config();
        let Some(amount) = parse_decimal(self.context.deposit_pair().amount(field)) else {
            return "0".to_string();
        };

        let kept = Decimal::from(100u32.saturating_sub(config.slippage_percent));
        amount
            .checked_mul(kept)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .map(|min| format_for_display(min, config.display_decimals))
            .unwrap_or_else(|| "0".to_string())
    }

    pub fn can_submit(&self) -> bool {
        if self.context.is_loading() || self.context.quote().is_none() {
            return false;
        }

        let balances = self.context.balances();
        let pair = self.context.deposit_pair();
        [
            (pair.token0_amount.as_str(), balances.token0.as_deref()),
            (pair.token1_amount.as_str(), balances.token1.as_deref()),
        ]
        .into_iter()
        .all(|(amount, balance)| {
            match (parse_decimal(amount), balance.and_then(parse_decimal)) {
                (Some(amount), Some(balance)) => amount > Decimal::ZERO && amount <= balance,
                _ => false,
            }
        })
    }

    /// Approves both tokens then deposits, stopping at the first step that
    /// does not succeed.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.can_submit() {
            warn!("Submit ignored: form is not ready");
            return SubmitOutcome::NotReady;
        }

        let amount0 = self.context.deposit_token0().to_string();
        let amount1 = self.context.deposit_token1().to_string();

        let outcome = self.context.approve_token0().await;
        if !outcome.is_success() {
            return Self::abort(SubmitStep::ApproveToken0, outcome);
        }

        let outcome = self.context.approve_token1().await;
        if !outcome.is_success() {
            return Self::abort(SubmitStep::ApproveToken1, outcome);
        }

        let outcome = self.context.add_liquidity().await;
        let Some(tx_hash) = outcome.tx_hash().cloned() else {
            return Self::abort(SubmitStep::AddLiquidity, outcome);
        };

        let receipt = DepositReceipt {
            tx_hash,
            amount0,
            amount1,
            submitted_at: Utc::now(),
        };
        info!("Deposit complete: {}", receipt.tx_hash);
        SubmitOutcome::Deposited(receipt)
    }

    fn abort(step: SubmitStep, outcome: TxOutcome) -> SubmitOutcome {
        error!("Deposit aborted at {}: {}", step, outcome.summary());
        SubmitOutcome::Aborted { step, outcome }
    }
}
