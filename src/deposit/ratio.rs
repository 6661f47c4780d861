use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    types::{ActiveField, DepositPair, MAX_INPUT_DECIMALS, PoolReserves, TOKEN_DECIMALS},
    utils::formatters::{format_full_precision, parse_decimal, sanitize_input},
};

/// Recomputes the inactive deposit field from the active one.
///
/// Returns the pair unchanged when reserves are missing, nothing is active,
/// the active field is empty, or the divisor reserve is zero. An active value
/// that cannot be converted (unparseable or overflowing) clears the paired
/// field.
pub fn derive_inactive_field(
    pair: &DepositPair,
    reserves: Option<&PoolReserves>,
    max_decimals: usize,
) -> DepositPair {
    let mut next = pair.clone();

    let (Some(reserves), Some(active)) = (reserves, pair.active) else {
        return next;
    };

    let source = pair.amount(active);
    if source.is_empty() {
        return next;
    }

    // token1 = token0 * r1 / r0, token0 = token1 * r0 / r1
    let (numerator, divisor) = match active {
        ActiveField::Token0 => (reserves.amount1, reserves.amount0),
        ActiveField::Token1 => (reserves.amount0, reserves.amount1),
    };

    if reserves.ratio().is_none() || divisor.is_zero() {
        debug!("Reserve ratio undefined (zero {} reserve), skipping recomputation", active.other());
        return next;
    }

    let Some(value) = parse_decimal(source) else {
        debug!("Cannot parse {} amount '{}', clearing {}", active, source, active.other());
        next.set_amount(active.other(), String::new());
        return next;
    };

    let Some(derived) = value
        .checked_mul(numerator)
        .and_then(|product| product.checked_div(divisor))
    else {
        warn!("Overflow deriving {} from {} = {}, clearing it", active.other(), active, source);
        next.set_amount(active.other(), String::new());
        return next;
    };

    let formatted = sanitize_input(&format_derived(derived), max_decimals);
    debug!("Derived {} = {} from {} = {}", active.other(), formatted, active, source);
    next.set_amount(active.other(), formatted);
    next
}

fn format_derived(amount: Decimal) -> String {
    format_full_precision(amount, TOKEN_DECIMALS)
}

/// Owns the deposit pair and keeps it consistent with the latest reserves.
///
/// Every mutation re-derives the inactive field before returning, so reads
/// never observe a pair computed against stale reserves.
#[derive(Debug, Clone)]
pub struct RatioEngine {
    pair: DepositPair,
    reserves: Option<PoolReserves>,
    max_input_decimals: usize,
}

impl RatioEngine {
    pub fn new(max_input_decimals: usize) -> Self {
        Self {
            pair: DepositPair::new(),
            reserves: None,
            max_input_decimals,
        }
    }

    pub fn pair(&self) -> &DepositPair {
        &self.pair
    }

    pub fn reserves(&self) -> Option<&PoolReserves> {
        self.reserves.as_ref()
    }

    pub fn update_token0(&mut self, value: &str) {
        self.update(ActiveField::Token0, value);
    }

    pub fn update_token1(&mut self, value: &str) {
        self.update(ActiveField::Token1, value);
    }

    pub fn update(&mut self, field: ActiveField, value: &str) {
        self.pair.active = Some(field);
        self.pair
            .set_amount(field, sanitize_input(value, self.max_input_decimals));
        self.rederive();
    }

    /// Replaces the reserves snapshot; `None` while unloaded or failed.
    pub fn set_reserves(&mut self, reserves: Option<PoolReserves>) {
        self.reserves = reserves;
        self.rederive();
    }

    pub fn clear(&mut self) {
        self.pair.clear();
    }

    fn rederive(&mut self) {
        self.pair = derive_inactive_field(&self.pair, self.reserves.as_ref(), self.max_input_decimals);
    }
}

impl Default for RatioEngine {
    fn default() -> Self {
        Self::new(MAX_INPUT_DECIMALS)
    }
}
