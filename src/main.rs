use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::{error, info};
use vault_deposit::{
    client::DryRunClient,
    context::ContractContext,
    form::DepositForm,
    types::{ActiveField, Address, Wei},
    utils::{config::Config, logger},
};

const CONFIG_PATH: &str = "config.toml";

/// Demo wallet funded by the dry-run chain.
const DEMO_WALLET: Address = Address::new([0x77; 20]);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load(CONFIG_PATH).context("loading configuration")?;
    logger::init(&config.logging.level);
    config.validate().context("validating configuration")?;

    let network = config.network_config();
    info!("Starting vault deposit on {} (chain {})", network.name, network.chain_id);

    if !config.execution.dry_run {
        bail!("no signing backend is available; set execution.dry_run = true");
    }

    let amount = std::env::args().nth(1).unwrap_or_else(|| "0.1".to_string());

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("installing Ctrl+C handler")?;
            info!("Received Ctrl-C, shutting down");
            Ok(())
        }
        result = run(&config, &amount) => result,
    }
}

async fn run(config: &Config, amount: &str) -> anyhow::Result<()> {
    let decimals = config.deposit.token_decimals;
    let contracts = config.contracts_config();

    let client = Arc::new(
        DryRunClient::new(
            contracts.token0,
            contracts.token1,
            (Wei::parse_units("1200", decimals)?, Wei::parse_units("1100", decimals)?),
            Wei::parse_units("1000", decimals)?,
        )
        .with_balance(contracts.token0, DEMO_WALLET, Wei::parse_units("2", decimals)?)
        .with_balance(contracts.token1, DEMO_WALLET, Wei::parse_units("2", decimals)?),
    );

    let mut context = ContractContext::new(config, client.clone(), client);
    context.connect(DEMO_WALLET);
    context.refresh().await;

    let token0 = contracts.token0_info(decimals);
    let token1 = contracts.token1_info(decimals);

    let mut form = DepositForm::new(&mut context);
    form.handle_input(ActiveField::Token0, amount);
    info!(
        "Deposit {} {} + {} {} (min {} / {})",
        form.context().deposit_token0(),
        token0.symbol,
        form.context().deposit_token1(),
        token1.symbol,
        form.min_received(ActiveField::Token0),
        form.min_received(ActiveField::Token1),
    );

    context.refresh_quote().await;
    if let Some(quote) = context.quote() {
        info!("Quote: min shares {} ({} ms old)", quote.min_shares, quote.age_ms());
    }

    let outcome = DepositForm::new(&mut context).submit().await;
    match outcome.notification() {
        Some(notification) => info!("{}", notification),
        None => error!("{}", outcome.summary()),
    }
    if let Some(message) = context.error() {
        error!("Last error: {}", message);
    }

    println!("{}", serde_json::to_string_pretty(&context.snapshot())?);
    Ok(())
}
