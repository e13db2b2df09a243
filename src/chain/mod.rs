//! Chain access for the staking contract.
//!
//! Everything the bot needs from the network goes through [`ChainClient`], so
//! the staking operations and the cycle controller can run against the real
//! `ethers` stack or an in-memory double.

use crate::config::GasConfig;
use crate::errors::Result;
use async_trait::async_trait;
use ethers::types::{Address, H256, Log, U256};

pub mod client;

pub use client::{DepositFilter, EthersChain, StakingVault, TransferFilter, WithdrawFilter};

/// Contract call the bot can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxRequest {
    /// `approve(stakingContract, amount)` on the share token.
    Approve { amount: U256 },
    /// Payable `deposit(assets, self)`, sending `assets` as value.
    Deposit { assets: U256 },
    /// `redeem(shares, self, self)`.
    Redeem { shares: U256 },
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Account that signs and receives.
    fn account(&self) -> Address;

    /// Staking contract, which is also the share token and the spender.
    fn staking_contract(&self) -> Address;

    async fn native_balance(&self) -> Result<U256>;

    async fn share_balance(&self) -> Result<U256>;

    async fn share_decimals(&self) -> Result<u8>;

    /// Allowance granted by the account to the staking contract.
    async fn allowance(&self) -> Result<U256>;

    /// Signs and broadcasts `request` with the given fee profile.
    async fn submit(&self, request: TxRequest, gas: &GasConfig) -> Result<H256>;

    /// Waits for the receipt and returns its logs. A reverted receipt is an error.
    async fn confirm(&self, tx_hash: H256) -> Result<Vec<Log>>;
}
