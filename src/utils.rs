//! Miscellaneous helper utilities.

use crate::errors::{AppError, Result};
use bigdecimal::BigDecimal;
use ethers::types::{H256, U256};
use num_bigint::BigInt;
use num_traits::Signed;
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Block explorer page for a transaction.
pub fn explorer_tx_url(explorer: &Url, tx_hash: H256) -> String {
    format!("{}/tx/{:?}", explorer.as_str().trim_end_matches('/'), tx_hash)
}

fn invalid(input: &str, reason: &str) -> AppError {
    AppError::InvalidAmount {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

/// Checks that `input` is a plain non-negative decimal such as `10` or `0.25`.
///
/// Exponent forms (`1e3`) and digit separators are rejected.
pub fn validate_amount(input: &str) -> Result<BigDecimal> {
    let trimmed = input.trim();
    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let plain = unsigned.chars().all(|c| c.is_ascii_digit() || c == '.')
        && unsigned.matches('.').count() <= 1
        && unsigned.chars().any(|c| c.is_ascii_digit());
    if !plain {
        return Err(invalid(input, "expected a plain decimal number"));
    }
    let value = BigDecimal::from_str(trimmed).map_err(|e| invalid(input, &e.to_string()))?;
    if value.is_negative() {
        return Err(invalid(input, "amount must not be negative"));
    }
    Ok(value)
}

/// Parses a decimal string into base units with the given number of decimals.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256> {
    let value = validate_amount(input)?.normalized();
    let (_, scale) = value.as_bigint_and_exponent();
    if scale > i64::from(decimals) {
        return Err(invalid(
            input,
            &format!("more than {decimals} fractional digits"),
        ));
    }
    let (digits, _) = value
        .with_scale(i64::from(decimals))
        .into_bigint_and_exponent();
    let digits = digits
        .to_biguint()
        .ok_or_else(|| invalid(input, "amount must not be negative"))?;
    U256::from_dec_str(&digits.to_str_radix(10)).map_err(|_| invalid(input, "amount overflows uint256"))
}

/// Converts base units back to a human decimal value.
pub fn format_amount(raw: U256, decimals: u8) -> BigDecimal {
    let digits = BigInt::parse_bytes(raw.to_string().as_bytes(), 10).unwrap_or_default();
    BigDecimal::new(digits, i64::from(decimals)).normalized()
}
