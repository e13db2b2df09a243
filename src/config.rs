//! Configuration loader and application settings.

use crate::errors::{AppError, Result};
use crate::models::CycleConfig;
use ethers::types::{Address, U256};
use ethers::utils::parse_units;
use std::fmt;
use std::time::Duration;
use url::Url;

const DEFAULT_RPC_URL: &str = "https://testnet-rpc.monad.xyz";
const DEFAULT_CHAIN_ID: u64 = 10143;
const DEFAULT_STAKING_CONTRACT: &str = "0x3a98250F98Dd388C211206983453837C8365BDc1";
const DEFAULT_EXPLORER_URL: &str = "https://testnet.monadexplorer.com";

/// Signing key wrapper that never prints its contents.
#[derive(Clone)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SecretKey {
    fn from(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

/// Chain the bot talks to.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc_url: Url,
    pub chain_id: u64,
    pub native_symbol: String,
    pub share_symbol: String,
    pub explorer: Url,
    pub staking_contract: Address,
}

/// Fixed fee profile applied to every submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasConfig {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub gas_limit: U256,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            max_fee_per_gas: U256::from(52_000_000_000u64),
            max_priority_fee_per_gas: U256::from(2_000_000_000u64),
            gas_limit: U256::from(60_000u64),
        }
    }
}

/// Timing of countdown progress ticks and fault recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    pub tick: Duration,
    pub retry_cooldown: Duration,
    /// `None` retries faulted iterations forever.
    pub max_consecutive_faults: Option<u32>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(60),
            retry_cooldown: Duration::from_secs(60),
            max_consecutive_faults: Some(10),
        }
    }
}

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub private_key: SecretKey,
    pub gas: GasConfig,
    pub timing: TimingConfig,
    /// Initial cycle parameters; the operator can change them from the menu.
    pub cycle: CycleConfig,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let private_key = var("PRIVATE_KEY")
            .map(|raw| SecretKey::from(raw.as_str()))
            .ok_or_else(|| AppError::Config("Set PRIVATE_KEY env var to the signing key".into()))?;

        let rpc_url = Url::parse(&var("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.into()))?;
        let explorer =
            Url::parse(&var("EXPLORER_URL").unwrap_or_else(|| DEFAULT_EXPLORER_URL.into()))?;
        let chain_id = parse_var(&var, "CHAIN_ID", DEFAULT_CHAIN_ID)?;
        let staking_contract: Address = var("STAKING_CONTRACT")
            .unwrap_or_else(|| DEFAULT_STAKING_CONTRACT.into())
            .parse()
            .map_err(|e| AppError::Config(format!("STAKING_CONTRACT: {e}")))?;

        let network = NetworkConfig {
            name: var("NETWORK_NAME").unwrap_or_else(|| "Monad Testnet".into()),
            rpc_url,
            chain_id,
            native_symbol: var("NATIVE_SYMBOL").unwrap_or_else(|| "MON".into()),
            share_symbol: var("SHARE_SYMBOL").unwrap_or_else(|| "shMON".into()),
            explorer,
            staking_contract,
        };

        let defaults = GasConfig::default();
        let gas = GasConfig {
            max_fee_per_gas: gwei_var(&var, "MAX_FEE_GWEI", defaults.max_fee_per_gas)?,
            max_priority_fee_per_gas: gwei_var(
                &var,
                "PRIORITY_FEE_GWEI",
                defaults.max_priority_fee_per_gas,
            )?,
            gas_limit: U256::from(parse_var(&var, "GAS_LIMIT", 60_000u64)?),
        };

        let timing = TimingConfig {
            tick: Duration::from_secs(parse_var(&var, "TICK_SECONDS", 60u64)?.max(1)),
            retry_cooldown: Duration::from_secs(parse_var(&var, "RETRY_COOLDOWN_SECONDS", 60u64)?),
            max_consecutive_faults: match parse_var(&var, "MAX_CONSECUTIVE_FAULTS", 10u32)? {
                0 => None,
                n => Some(n),
            },
        };

        let seed = CycleConfig::default();
        let cycle = CycleConfig::new(
            &var("DEPOSIT_AMOUNT").unwrap_or(seed.deposit_amount),
            &var("REDEEM_AMOUNT").unwrap_or_else(|| seed.redeem_amount.to_string()),
            parse_var(&var, "DEPOSIT_DELAY_MINUTES", seed.post_deposit_delay_minutes)?,
            parse_var(&var, "REDEEM_DELAY_MINUTES", seed.post_redeem_delay_minutes)?,
        )?;

        Ok(Self {
            network,
            private_key,
            gas,
            timing,
            cycle,
        })
    }
}

fn parse_var<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key}: {e}"))),
        None => Ok(default),
    }
}

fn gwei_var<F>(var: &F, key: &str, default: U256) -> Result<U256>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => parse_units(raw.trim(), "gwei")
            .map(U256::from)
            .map_err(|e| AppError::Config(format!("{key}: {e}"))),
        None => Ok(default),
    }
}
