//! Staking operations against the fixed staking contract.
//!
//! [`Staker`] owns the chain client and the fee profile and exposes the four
//! account-level operations: reading balances, ensuring approval, depositing
//! native assets for shares and redeeming shares for native assets.

use crate::chain::ChainClient;
use crate::config::{GasConfig, NetworkConfig};
use std::sync::Arc;

pub mod allowance;
pub mod balances;
pub mod convert;
pub mod events;

pub use events::{EventScan, minted_shares, withdrawn_assets};

/// Handle for running staking operations for a single account.
pub struct Staker<C> {
    chain: Arc<C>,
    gas: GasConfig,
    network: NetworkConfig,
}

impl<C: ChainClient> Staker<C> {
    pub fn new(chain: Arc<C>, gas: GasConfig, network: NetworkConfig) -> Self {
        Self {
            chain,
            gas,
            network,
        }
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }
}
