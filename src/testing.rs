//! In-memory chain double shared by the unit tests.

use crate::chain::{ChainClient, DepositFilter, TransferFilter, TxRequest, WithdrawFilter};
use crate::config::{GasConfig, NetworkConfig};
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use ethers::abi::{Token, encode};
use ethers::contract::EthEvent;
use ethers::types::{Address, H256, Log, U256};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use url::Url;

/// Whole native tokens (18 decimals) in base units.
pub fn units(n: u64) -> U256 {
    U256::from(n) * U256::exp10(18)
}

pub fn account() -> Address {
    Address::from_low_u64_be(0xA11CE)
}

pub fn staking_contract() -> Address {
    Address::from_low_u64_be(0x57A4E)
}

pub fn network() -> NetworkConfig {
    NetworkConfig {
        name: "Fakenet".into(),
        rpc_url: Url::parse("http://127.0.0.1:8545").expect("static url"),
        chain_id: 31337,
        native_symbol: "MON".into(),
        share_symbol: "shMON".into(),
        explorer: Url::parse("https://explorer.invalid").expect("static url"),
        staking_contract: staking_contract(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeState {
    pub native: U256,
    pub shares: U256,
    pub decimals: u8,
    pub allowance: U256,
    pub submissions: Vec<TxRequest>,
    pub fail_reads: bool,
    pub fail_allowance: bool,
    /// Next confirmation reports this revert reason.
    pub revert_next: Option<String>,
    pub emit_events: bool,
    /// Number of upcoming balance reads that panic.
    pub panics_remaining: u32,
    pub confirm_delay: Duration,
    receipts: HashMap<H256, Vec<Log>>,
}

/// Chain with 1:1 share pricing and instant finality.
pub struct FakeChain {
    state: Mutex<FakeState>,
}

impl FakeChain {
    pub fn new(native: U256, shares: U256) -> Self {
        Self {
            state: Mutex::new(FakeState {
                native,
                shares,
                decimals: 18,
                allowance: U256::MAX,
                emit_events: true,
                ..FakeState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.lock());
    }

    pub fn snapshot(&self) -> FakeState {
        self.lock().clone()
    }

    pub fn submissions(&self) -> Vec<TxRequest> {
        self.lock().submissions.clone()
    }

    pub fn deposits(&self) -> usize {
        self.submissions()
            .iter()
            .filter(|r| matches!(r, TxRequest::Deposit { .. }))
            .count()
    }

    pub fn redeems(&self) -> usize {
        self.submissions()
            .iter()
            .filter(|r| matches!(r, TxRequest::Redeem { .. }))
            .count()
    }

    fn event_log(&self, topics: Vec<H256>, words: &[U256]) -> Log {
        Log {
            address: staking_contract(),
            topics,
            data: encode(&words.iter().map(|w| Token::Uint(*w)).collect::<Vec<_>>()).into(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    fn account(&self) -> Address {
        account()
    }

    fn staking_contract(&self) -> Address {
        staking_contract()
    }

    async fn native_balance(&self) -> Result<U256> {
        let state = self.lock();
        if state.fail_reads {
            return Err(AppError::Network("rpc unreachable".into()));
        }
        Ok(state.native)
    }

    async fn share_balance(&self) -> Result<U256> {
        let should_panic = {
            let mut state = self.lock();
            if state.panics_remaining > 0 {
                state.panics_remaining -= 1;
                true
            } else {
                false
            }
        };
        if should_panic {
            panic!("simulated fault while reading shares");
        }
        let state = self.lock();
        if state.fail_reads {
            return Err(AppError::Network("rpc unreachable".into()));
        }
        Ok(state.shares)
    }

    async fn share_decimals(&self) -> Result<u8> {
        Ok(self.lock().decimals)
    }

    async fn allowance(&self) -> Result<U256> {
        let state = self.lock();
        if state.fail_allowance {
            return Err(AppError::Network("allowance query timed out".into()));
        }
        Ok(state.allowance)
    }

    async fn submit(&self, request: TxRequest, _gas: &GasConfig) -> Result<H256> {
        let me = H256::from(account());
        let mut state = self.lock();
        state.submissions.push(request);
        let tx_hash = H256::from_low_u64_be(state.submissions.len() as u64);
        let logs = match request {
            TxRequest::Approve { amount } => {
                state.allowance = amount;
                Vec::new()
            }
            TxRequest::Deposit { assets } => {
                state.native = state.native.saturating_sub(assets);
                state.shares += assets;
                vec![
                    self.event_log(vec![TransferFilter::signature(), H256::zero(), me], &[assets]),
                    self.event_log(vec![DepositFilter::signature(), me, me], &[assets, assets]),
                ]
            }
            TxRequest::Redeem { shares } => {
                state.shares = state.shares.saturating_sub(shares);
                state.native += shares;
                vec![self.event_log(
                    vec![WithdrawFilter::signature(), me, me, me],
                    &[shares, shares],
                )]
            }
        };
        let logs = if state.emit_events { logs } else { Vec::new() };
        state.receipts.insert(tx_hash, logs);
        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: H256) -> Result<Vec<Log>> {
        let delay = self.lock().confirm_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.lock();
        if let Some(reason) = state.revert_next.take() {
            return Err(AppError::TransactionRevert(reason));
        }
        state.receipts.remove(&tx_hash).ok_or(AppError::Dropped(tx_hash))
    }
}
