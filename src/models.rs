//! Shared data structures used throughout the application.

use crate::errors::{AppError, Result};
use crate::utils::{format_amount, parse_amount, validate_amount};
use bigdecimal::BigDecimal;
use ethers::types::{H256, U256};
use std::fmt;
use std::str::FromStr;

/// Decimals of the chain's native asset.
pub const NATIVE_DECIMALS: u8 = 18;

/// Point-in-time balances of the bot's account. Always read fresh, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub native: U256,
    pub shares: U256,
    pub share_decimals: u8,
}

impl BalanceSnapshot {
    pub fn native_display(&self) -> BigDecimal {
        format_amount(self.native, NATIVE_DECIMALS)
    }

    pub fn shares_display(&self) -> BigDecimal {
        format_amount(self.shares, self.share_decimals)
    }
}

/// Result of a single deposit or redeem.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionOutcome {
    pub success: bool,
    pub tx_hash: Option<H256>,
    /// Amount received, when the receipt carried a decodable event.
    pub amount_converted: Option<BigDecimal>,
    pub failure_reason: Option<String>,
}

impl TransactionOutcome {
    pub fn succeeded(tx_hash: H256, amount_converted: Option<BigDecimal>) -> Self {
        Self {
            success: true,
            tx_hash: Some(tx_hash),
            amount_converted,
            failure_reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            tx_hash: None,
            amount_converted: None,
            failure_reason: Some(reason.into()),
        }
    }
}

/// Share amount to redeem: a fixed decimal amount or the whole balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemAmount {
    All,
    Exact(String),
}

impl FromStr for RedeemAmount {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(RedeemAmount::All);
        }
        validate_amount(s)?;
        Ok(RedeemAmount::Exact(s.to_string()))
    }
}

impl fmt::Display for RedeemAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedeemAmount::All => write!(f, "ALL"),
            RedeemAmount::Exact(amount) => write!(f, "{amount}"),
        }
    }
}

/// Operator-supplied parameters for the stake/unstake cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleConfig {
    pub deposit_amount: String,
    pub redeem_amount: RedeemAmount,
    pub post_deposit_delay_minutes: u64,
    pub post_redeem_delay_minutes: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            deposit_amount: "0".to_string(),
            redeem_amount: RedeemAmount::Exact("0".to_string()),
            post_deposit_delay_minutes: 180,
            post_redeem_delay_minutes: 360,
        }
    }
}

impl CycleConfig {
    /// Builds a config, rejecting amounts that are not non-negative decimals.
    ///
    /// The deposit amount must also fit the native asset's decimals.
    pub fn new(
        deposit_amount: &str,
        redeem_amount: &str,
        post_deposit_delay_minutes: u64,
        post_redeem_delay_minutes: u64,
    ) -> Result<Self> {
        let deposit_amount = deposit_amount.trim();
        parse_amount(deposit_amount, NATIVE_DECIMALS)?;
        Ok(Self {
            deposit_amount: deposit_amount.to_string(),
            redeem_amount: redeem_amount.parse()?,
            post_deposit_delay_minutes,
            post_redeem_delay_minutes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeem_sentinel_is_case_insensitive() {
        assert_eq!("all".parse::<RedeemAmount>().unwrap(), RedeemAmount::All);
        assert_eq!(" ALL ".parse::<RedeemAmount>().unwrap(), RedeemAmount::All);
        assert_eq!(
            "2.5".parse::<RedeemAmount>().unwrap(),
            RedeemAmount::Exact("2.5".into())
        );
        assert!("some".parse::<RedeemAmount>().is_err());
    }

    #[test]
    fn cycle_config_rejects_negative_amounts() {
        assert!(CycleConfig::new("-1", "all", 1, 1).is_err());
        assert!(CycleConfig::new("1", "-0.5", 1, 1).is_err());
        let cfg = CycleConfig::new(" 10 ", "all", 0, 5).unwrap();
        assert_eq!(cfg.deposit_amount, "10");
        assert_eq!(cfg.redeem_amount, RedeemAmount::All);
        assert_eq!(cfg.post_deposit_delay_minutes, 0);
    }

    #[test]
    fn cycle_config_rejects_unusable_deposits() {
        assert!(CycleConfig::new("1e3", "all", 1, 1).is_err());
        assert!(CycleConfig::new("1e999999999999", "all", 1, 1).is_err());
        assert!(CycleConfig::new("0.0000000000000000001", "all", 1, 1).is_err());
        assert!(CycleConfig::new("10", "1e999999999999", 1, 1).is_err());
        assert!(CycleConfig::new("0.000000000000000001", "all", 1, 1).is_ok());
    }

    #[test]
    fn snapshot_display_uses_decimals() {
        let snap = BalanceSnapshot {
            native: U256::exp10(18) * 3,
            shares: U256::from(1_500_000u64),
            share_decimals: 6,
        };
        assert_eq!(snap.native_display(), BigDecimal::from(3));
        assert_eq!(snap.shares_display(), "1.5".parse::<BigDecimal>().unwrap());
    }
}
