use super::Staker;
use crate::chain::{ChainClient, TxRequest};
use crate::errors::Result;
use ethers::types::U256;
use tracing::{debug, error, info};

impl<C: ChainClient> Staker<C> {
    /// Makes sure the staking contract may spend the account's shares.
    ///
    /// Grants an unlimited allowance when the current one is zero. Errors are
    /// logged and reported as `false`.
    pub async fn ensure_approval(&self) -> bool {
        match self.try_ensure_approval().await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "[APPROVE] approval failed");
                false
            }
        }
    }

    async fn try_ensure_approval(&self) -> Result<()> {
        let allowance = self.chain.allowance().await?;
        if !allowance.is_zero() {
            debug!(%allowance, "[APPROVE] allowance already granted");
            return Ok(());
        }
        info!(
            "[APPROVE] approving unlimited {} spending",
            self.network.share_symbol
        );
        self.submit_and_confirm("APPROVE", TxRequest::Approve { amount: U256::MAX })
            .await?;
        info!("[APPROVE] unlimited approval granted");
        Ok(())
    }
}
