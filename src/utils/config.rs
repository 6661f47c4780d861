use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::types::{
    Address, DISPLAY_DECIMALS, MAX_INPUT_DECIMALS, Result, SLIPPAGE_PERCENT, TOKEN_DECIMALS,
    TokenInfo, VaultError,
};

/// Prefix for environment overrides, e.g. `VAULT__DEPOSIT__SLIPPAGE_PERCENT=3`.
const ENV_PREFIX: &str = "VAULT";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target network
    pub network: NetworkConfig,

    /// Vault, router and token addresses
    pub contracts: ContractsConfig,

    /// Deposit math and write settings
    pub deposit: DepositConfig,

    /// Execution mode
    pub execution: ExecutionConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Single target chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: 42161,
            name: "arbitrum".into(),
            rpc_url: "https://arb1.arbitrum.io/rpc".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractsConfig {
    pub router: Address,
    pub helper: Address,
    pub resolver: Address,
    pub vault: Address,
    pub token0: Address,
    pub token1: Address,
    pub token0_symbol: String,
    pub token1_symbol: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        // WETH and rETH on Arbitrum One; vault-side contracts must be configured
        Self {
            router: Address::ZERO,
            helper: Address::ZERO,
            resolver: Address::ZERO,
            vault: Address::ZERO,
            token0: Address::new([
                0x82, 0xaf, 0x49, 0x44, 0x7d, 0x8a, 0x07, 0xe3, 0xbd, 0x95, 0xbd, 0x0d, 0x56,
                0xf3, 0x52, 0x41, 0x52, 0x3f, 0xba, 0xb1,
            ]),
            token1: Address::new([
                0xec, 0x70, 0xdc, 0xb4, 0xa1, 0xef, 0xa4, 0x6b, 0x8f, 0x2d, 0x97, 0xc3, 0x10,
                0xc9, 0xc4, 0x79, 0x0b, 0xa5, 0xff, 0xa8,
            ]),
            token0_symbol: "WETH".into(),
            token1_symbol: "rETH".into(),
        }
    }
}

impl ContractsConfig {
    pub fn token0_info(&self, decimals: u32) -> TokenInfo {
        TokenInfo::new(self.token0_symbol.clone(), self.token0, decimals)
    }

    pub fn token1_info(&self, decimals: u32) -> TokenInfo {
        TokenInfo::new(self.token1_symbol.clone(), self.token1, decimals)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositConfig {
    /// Whole-percent buffer between max and min amounts
    pub slippage_percent: u32,

    /// Fixed-point scale of both tokens
    pub token_decimals: u32,

    /// Fractional digits kept from typed input
    pub max_input_decimals: usize,

    /// Fractional digits in balance and minimum previews
    pub display_decimals: u32,

    /// Upper bound on a single wallet write, confirmation included
    pub write_timeout_secs: u64,
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self {
            slippage_percent: SLIPPAGE_PERCENT,
            token_decimals: TOKEN_DECIMALS,
            max_input_decimals: MAX_INPUT_DECIMALS,
            display_decimals: DISPLAY_DECIMALS,
            write_timeout_secs: 120,
        }
    }
}

impl DepositConfig {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Route writes to the simulated chain instead of a wallet
    pub dry_run: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self { dry_run: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Config {
    pub fn network_config(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn contracts_config(&self) -> &ContractsConfig {
        &self.contracts
    }

    pub fn deposit_config(&self) -> &DepositConfig {
        &self.deposit
    }

    /// Defaults, then the TOML file if present, then `VAULT__*` variables.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Config::default())?)
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parses a TOML document on top of the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Config::default())?)
            .add_source(::config::File::from_str(content, ::config::FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<()> {
        let deposit = &self.deposit;

        if deposit.slippage_percent >= 100 {
            return Err(VaultError::Config(format!(
                "slippage_percent must be below 100, got {}",
                deposit.slippage_percent
            )));
        }

        if deposit.token_decimals > TOKEN_DECIMALS {
            return Err(VaultError::Config(format!(
                "token_decimals above {} is not supported",
                TOKEN_DECIMALS
            )));
        }

        if deposit.max_input_decimals > deposit.token_decimals as usize {
            return Err(VaultError::Config(
                "max_input_decimals cannot exceed token_decimals".into(),
            ));
        }

        if deposit.write_timeout_secs == 0 {
            return Err(VaultError::Config("write_timeout_secs must be positive".into()));
        }

        if self.contracts.token0 == self.contracts.token1 {
            return Err(VaultError::Config("token0 and token1 must differ".into()));
        }

        if !self.execution.dry_run {
            let required = [
                ("router", self.contracts.router),
                ("helper", self.contracts.helper),
                ("resolver", self.contracts.resolver),
                ("vault", self.contracts.vault),
            ];
            for (name, address) in required {
                if address.is_zero() {
                    return Err(VaultError::Config(format!(
                        "{} address required when not in dry-run mode",
                        name
                    )));
                }
            }
        }

        Ok(())
    }
}
