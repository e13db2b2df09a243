use super::Staker;
use crate::chain::ChainClient;
use crate::errors::Result;
use crate::models::BalanceSnapshot;
use tracing::debug;

impl<C: ChainClient> Staker<C> {
    /// Reads native balance, share balance and share decimals concurrently.
    ///
    /// Any failed read fails the whole snapshot.
    pub async fn read_balances(&self) -> Result<BalanceSnapshot> {
        let (native, shares, share_decimals) = futures::try_join!(
            self.chain.native_balance(),
            self.chain.share_balance(),
            self.chain.share_decimals()
        )?;
        let snapshot = BalanceSnapshot {
            native,
            shares,
            share_decimals,
        };
        debug!(
            native = %snapshot.native_display(),
            shares = %snapshot.shares_display(),
            "[BALANCE] snapshot"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use crate::staking::Staker;
    use crate::testing::{FakeChain, network, units};
    use std::sync::Arc;

    #[tokio::test]
    async fn snapshot_reads_both_balances() {
        let chain = Arc::new(FakeChain::new(units(5), units(2)));
        chain.with(|s| s.decimals = 6);
        let staker = Staker::new(chain, Default::default(), network());
        let snap = staker.read_balances().await.unwrap();
        assert_eq!(snap.native, units(5));
        assert_eq!(snap.shares, units(2));
        assert_eq!(snap.share_decimals, 6);
    }

    #[tokio::test]
    async fn any_failed_read_fails_snapshot() {
        let chain = Arc::new(FakeChain::new(units(5), units(2)));
        chain.with(|s| s.fail_reads = true);
        let staker = Staker::new(chain, Default::default(), network());
        assert!(staker.read_balances().await.is_err());
    }
}
