//! Deposit (native → shares) and redeem (shares → native) conversions.

use super::Staker;
use super::events::{EventScan, minted_shares, withdrawn_assets};
use crate::chain::{ChainClient, TxRequest};
use crate::errors::{AppError, Result};
use crate::models::{NATIVE_DECIMALS, RedeemAmount, TransactionOutcome};
use crate::utils::{explorer_tx_url, format_amount, parse_amount};
use bigdecimal::BigDecimal;
use ethers::types::{H256, Log, U256};
use tracing::{error, info, warn};

impl<C: ChainClient> Staker<C> {
    /// Converts `amount` of the native asset into shares.
    pub async fn deposit(&self, amount: &str) -> TransactionOutcome {
        self.try_deposit(amount)
            .await
            .unwrap_or_else(|e| self.failure("DEPOSIT", e))
    }

    /// Converts shares back into the native asset.
    pub async fn redeem(&self, amount: &RedeemAmount) -> TransactionOutcome {
        self.try_redeem(amount)
            .await
            .unwrap_or_else(|e| self.failure("REDEEM", e))
    }

    async fn try_deposit(&self, amount: &str) -> Result<TransactionOutcome> {
        let balances = self.read_balances().await?;
        let assets = parse_amount(amount, NATIVE_DECIMALS)?;
        if assets > balances.native {
            return Err(AppError::InsufficientBalance {
                asset: self.network.native_symbol.clone(),
                requested: format_amount(assets, NATIVE_DECIMALS).to_string(),
                available: balances.native_display().to_string(),
            });
        }

        info!(
            receiver = ?self.chain.account(),
            gas_limit = %self.gas.gas_limit,
            "[DEPOSIT] converting {} {} to {}",
            format_amount(assets, NATIVE_DECIMALS),
            self.network.native_symbol,
            self.network.share_symbol
        );
        let (tx_hash, logs) = self
            .submit_and_confirm("DEPOSIT", TxRequest::Deposit { assets })
            .await?;

        let received = self.report(
            "DEPOSIT",
            minted_shares(&logs),
            balances.share_decimals,
            &self.network.share_symbol,
        );
        Ok(TransactionOutcome::succeeded(tx_hash, received))
    }

    async fn try_redeem(&self, amount: &RedeemAmount) -> Result<TransactionOutcome> {
        let balances = self.read_balances().await?;
        if !self.ensure_approval().await {
            return Err(AppError::Other(format!(
                "{} spending is not approved",
                self.network.share_symbol
            )));
        }

        let shares = match amount {
            RedeemAmount::All => balances.shares,
            RedeemAmount::Exact(raw) => parse_amount(raw, balances.share_decimals)?,
        };
        if shares > balances.shares {
            return Err(AppError::InsufficientBalance {
                asset: self.network.share_symbol.clone(),
                requested: format_amount(shares, balances.share_decimals).to_string(),
                available: balances.shares_display().to_string(),
            });
        }

        info!(
            receiver = ?self.chain.account(),
            gas_limit = %self.gas.gas_limit,
            "[REDEEM] converting {} {} to {}",
            format_amount(shares, balances.share_decimals),
            self.network.share_symbol,
            self.network.native_symbol
        );
        let (tx_hash, logs) = self
            .submit_and_confirm("REDEEM", TxRequest::Redeem { shares })
            .await?;

        let received = self.report(
            "REDEEM",
            withdrawn_assets(&logs),
            NATIVE_DECIMALS,
            &self.network.native_symbol,
        );
        Ok(TransactionOutcome::succeeded(tx_hash, received))
    }

    /// Submits `request`, logs its explorer link and waits for the receipt.
    pub(crate) async fn submit_and_confirm(
        &self,
        label: &str,
        request: TxRequest,
    ) -> Result<(H256, Vec<Log>)> {
        let tx_hash = self.chain.submit(request, &self.gas).await?;
        info!(
            url = %explorer_tx_url(&self.network.explorer, tx_hash),
            "[{label}] transaction sent, waiting for confirmation"
        );
        let logs = self.chain.confirm(tx_hash).await?;
        Ok((tx_hash, logs))
    }

    fn report(
        &self,
        label: &str,
        scan: EventScan<U256>,
        decimals: u8,
        symbol: &str,
    ) -> Option<BigDecimal> {
        match scan {
            EventScan::Decoded(raw) => {
                let amount = format_amount(raw, decimals);
                info!("[{label}] success! received {amount} {symbol}");
                Some(amount)
            }
            EventScan::Malformed(reason) => {
                warn!(%reason, "[{label}] receipt event did not decode");
                info!("[{label}] conversion successful");
                None
            }
            EventScan::Missing => {
                info!("[{label}] conversion successful");
                None
            }
        }
    }

    fn failure(&self, label: &str, err: AppError) -> TransactionOutcome {
        error!(error = %err, "[{label}] conversion failed");
        TransactionOutcome::failed(err.to_string())
    }
}
