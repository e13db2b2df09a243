use anyhow::Result;
use staking_cycle_bot::{
    chain::{ChainClient, EthersChain},
    cli::Menu,
    config::AppConfig,
    cycle::{Countdown, CycleController},
    staking::Staker,
    utils,
};
use std::sync::Arc;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::from_env()?;
    let chain = Arc::new(EthersChain::new(&config.network, &config.private_key)?);
    if let Err(e) = chain.check_network().await {
        tracing::warn!(error = %e, "[INIT] network check failed");
    }
    tracing::info!(
        network = %config.network.name,
        chain_id = config.network.chain_id,
        wallet = ?chain.account(),
        staking_contract = ?config.network.staking_contract,
        "[INIT] staking-cycle-bot starting"
    );

    let staker = Arc::new(Staker::new(chain, config.gas, config.network.clone()));
    let controller = CycleController::new(
        staker.clone(),
        Countdown::new(config.timing.tick),
        &config.timing,
    );

    let mut menu = Menu::new(staker, controller, config.cycle);
    menu.show_balances().await;
    menu.run(BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}
