use super::{ChainClient, TxRequest};
use crate::config::{GasConfig, NetworkConfig, SecretKey};
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use ethers::{
    contract::{ContractError, abigen},
    middleware::{SignerMiddleware, signer::SignerMiddlewareError},
    providers::{Http, Middleware, MiddlewareError, PendingTransaction, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, Eip1559TransactionRequest, H256, Log, U64, U256},
};
use std::sync::Arc;
use tracing::debug;

abigen!(
    StakingVault,
    r"[
        function balanceOf(address account) view returns (uint256)
        function decimals() view returns (uint8)
        function approve(address spender, uint256 amount) returns (bool)
        function allowance(address owner, address spender) view returns (uint256)
        function deposit(uint256 assets, address receiver) payable returns (uint256)
        function redeem(uint256 shares, address receiver, address owner) returns (uint256)
        event Transfer(address indexed from, address indexed to, uint256 value)
        event Deposit(address indexed caller, address indexed owner, uint256 assets, uint256 shares)
        event Withdraw(address indexed caller, address indexed receiver, address indexed owner, uint256 assets, uint256 shares)
    ]",
);

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Live chain access through an HTTP provider and a local signing wallet.
#[derive(Clone)]
pub struct EthersChain {
    client: Arc<SignerClient>,
    vault: StakingVault<SignerClient>,
    chain_id: u64,
}

impl EthersChain {
    pub fn new(network: &NetworkConfig, key: &SecretKey) -> Result<Self> {
        let provider = Provider::<Http>::try_from(network.rpc_url.as_str())?;
        let wallet = key
            .expose()
            .parse::<LocalWallet>()?
            .with_chain_id(network.chain_id);
        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        let vault = StakingVault::new(network.staking_contract, client.clone());
        Ok(Self {
            client,
            vault,
            chain_id: network.chain_id,
        })
    }

    /// Sanity-check that the node answers and serves the configured chain.
    pub async fn check_network(&self) -> Result<()> {
        let remote = self.client.get_chainid().await.map_err(middleware_error)?;
        if remote != U256::from(self.chain_id) {
            return Err(AppError::Config(format!(
                "RPC serves chain {remote}, expected {}",
                self.chain_id
            )));
        }
        Ok(())
    }
}

fn middleware_error(err: SignerMiddlewareError<Provider<Http>, LocalWallet>) -> AppError {
    match err.as_error_response() {
        Some(rpc) => rpc_error(rpc.code, &rpc.message),
        None => AppError::Network(err.to_string()),
    }
}

/// JSON-RPC code 3 is the standard execution-revert error.
const EXECUTION_REVERTED: i64 = 3;

/// Only execution reverts count as reverts; every other node error (rate
/// limits, nonce or fee rejections) is a network failure.
fn rpc_error(code: i64, message: &str) -> AppError {
    if code == EXECUTION_REVERTED || message.to_ascii_lowercase().contains("execution reverted") {
        AppError::TransactionRevert(message.to_string())
    } else {
        AppError::Network(format!("rpc error {code}: {message}"))
    }
}

fn contract_error(err: ContractError<SignerClient>) -> AppError {
    if let Some(reason) = err.decode_revert::<String>() {
        return AppError::TransactionRevert(reason);
    }
    AppError::Contract(err.to_string())
}

#[async_trait]
impl ChainClient for EthersChain {
    fn account(&self) -> Address {
        self.client.address()
    }

    fn staking_contract(&self) -> Address {
        self.vault.address()
    }

    async fn native_balance(&self) -> Result<U256> {
        self.client
            .get_balance(self.account(), None)
            .await
            .map_err(middleware_error)
    }

    async fn share_balance(&self) -> Result<U256> {
        self.vault
            .balance_of(self.account())
            .call()
            .await
            .map_err(contract_error)
    }

    async fn share_decimals(&self) -> Result<u8> {
        self.vault.decimals().call().await.map_err(contract_error)
    }

    async fn allowance(&self) -> Result<U256> {
        self.vault
            .allowance(self.account(), self.staking_contract())
            .call()
            .await
            .map_err(contract_error)
    }

    async fn submit(&self, request: TxRequest, gas: &GasConfig) -> Result<H256> {
        let account = self.account();
        let staking = self.staking_contract();
        let (calldata, value) = match request {
            TxRequest::Approve { amount } => {
                (self.vault.approve(staking, amount).calldata(), U256::zero())
            }
            TxRequest::Deposit { assets } => (self.vault.deposit(assets, account).calldata(), assets),
            TxRequest::Redeem { shares } => (
                self.vault.redeem(shares, account, account).calldata(),
                U256::zero(),
            ),
        };
        let calldata =
            calldata.ok_or_else(|| AppError::Other("contract call produced no calldata".into()))?;

        let tx = Eip1559TransactionRequest::new()
            .from(account)
            .to(staking)
            .data(calldata)
            .value(value)
            .gas(gas.gas_limit)
            .max_fee_per_gas(gas.max_fee_per_gas)
            .max_priority_fee_per_gas(gas.max_priority_fee_per_gas)
            .chain_id(self.chain_id);

        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(middleware_error)?;
        let tx_hash = pending.tx_hash();
        debug!(?tx_hash, ?request, "[CHAIN] transaction broadcast");
        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: H256) -> Result<Vec<Log>> {
        let receipt = PendingTransaction::new(tx_hash, self.client.provider())
            .confirmations(1)
            .await?
            .ok_or(AppError::Dropped(tx_hash))?;
        if receipt.status == Some(U64::zero()) {
            return Err(AppError::TransactionRevert(format!(
                "transaction {tx_hash:?} reverted on-chain"
            )));
        }
        Ok(receipt.logs)
    }
}
