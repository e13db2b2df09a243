//! Line-oriented operator menu.

use crate::chain::ChainClient;
use crate::cycle::CycleController;
use crate::errors::Result;
use crate::models::{CycleConfig, RedeemAmount};
use crate::staking::Staker;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::error;

const BANNER: &str = r"
         __    __  ___                      __
   _____/ /_  /  |/  /___  ____  ____ _____/ /
  / ___/ __ \/ /|_/ / __ \/ __ \/ __ `/ __  /
 (__  ) / / / /  / / /_/ / / / / /_/ / /_/ /
/____/_/ /_/_/  /_/\____/_/ /_/\__,_/\__,_/
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ShowBalances,
    Configure,
    Start,
    Stop,
    Status,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::ShowBalances),
            "2" => Some(Self::Configure),
            "3" => Some(Self::Start),
            "4" => Some(Self::Stop),
            "5" => Some(Self::Status),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Interactive front end over the staker and the cycle controller.
pub struct Menu<C> {
    staker: Arc<Staker<C>>,
    controller: CycleController<C>,
    config: CycleConfig,
}

impl<C: ChainClient + 'static> Menu<C> {
    pub fn new(staker: Arc<Staker<C>>, controller: CycleController<C>, config: CycleConfig) -> Self {
        Self {
            staker,
            controller,
            config,
        }
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    /// Runs the menu until the operator exits or input ends.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        loop {
            print_menu();
            let Some(choice) = prompt(&mut lines, "Select an option (1-6): ").await? else {
                break;
            };
            match MenuChoice::parse(&choice) {
                Some(MenuChoice::ShowBalances) => self.show_balances().await,
                Some(MenuChoice::Configure) => self.configure(&mut lines).await?,
                Some(MenuChoice::Start) => self.start(),
                Some(MenuChoice::Stop) => {
                    self.controller.stop();
                }
                Some(MenuChoice::Status) => self.show_status(),
                Some(MenuChoice::Exit) => {
                    println!("Exiting...");
                    break;
                }
                None => println!("Invalid option"),
            }
        }
        Ok(())
    }

    pub async fn show_balances(&self) {
        let network = self.staker.network();
        match self.staker.read_balances().await {
            Ok(balances) => {
                println!("\nCurrent Balances:");
                println!("-----------------");
                println!(
                    "Native {sym} Balance: {} {sym}",
                    balances.native_display(),
                    sym = network.native_symbol
                );
                println!(
                    "{sym} Token Balance: {} {sym}",
                    balances.shares_display(),
                    sym = network.share_symbol
                );
                println!("Wallet Address: {:?}\n", self.staker.chain().account());
            }
            Err(e) => error!(error = %e, "[BALANCE] error fetching balances"),
        }
    }

    fn start(&self) {
        let _handle = self.controller.start(self.config.clone());
    }

    async fn configure<R: AsyncBufRead + Unpin>(&mut self, lines: &mut Lines<R>) -> Result<()> {
        let network = self.staker.network();
        let questions = [
            format!(
                "\nEnter amount of {} to convert to {}: ",
                network.native_symbol, network.share_symbol
            ),
            format!(
                "Enter amount of {} to convert back to {} (or \"all\" for all balance): ",
                network.share_symbol, network.native_symbol
            ),
            format!(
                "Enter delay (in minutes) after {} to {} conversion: ",
                network.native_symbol, network.share_symbol
            ),
            format!(
                "Enter delay (in minutes) after {} to {} conversion: ",
                network.share_symbol, network.native_symbol
            ),
        ];
        let mut answers = Vec::with_capacity(questions.len());
        for question in &questions {
            match prompt(lines, question).await? {
                Some(answer) => answers.push(answer),
                None => return Ok(()),
            }
        }

        let parsed = parse_delay(&answers[2]).and_then(|after_deposit| {
            parse_delay(&answers[3]).map(|after_redeem| (after_deposit, after_redeem))
        });
        let config = match parsed {
            Some((after_deposit, after_redeem)) => {
                match CycleConfig::new(&answers[0], &answers[1], after_deposit, after_redeem) {
                    Ok(config) => config,
                    Err(e) => {
                        println!("\nConfiguration rejected: {e}");
                        return Ok(());
                    }
                }
            }
            None => {
                println!("\nConfiguration rejected: delays must be whole minutes (0 or more)");
                return Ok(());
            }
        };
        self.config = config;

        println!("\nAuto-swap configuration complete!");
        for line in describe_config(&self.config, &network.native_symbol, &network.share_symbol) {
            println!("{line}");
        }

        if let Some(answer) = prompt(lines, "\nStart auto-swap now? (y/n): ").await? {
            if answer.trim().eq_ignore_ascii_case("y") {
                self.start();
            }
        }
        Ok(())
    }

    fn show_status(&self) {
        let status = self.controller.status();
        let network = self.staker.network();
        println!("\nAuto-Swap Status:");
        println!("-----------------");
        println!("Running: {}", if status.running { "Yes" } else { "No" });
        if let (true, Some(config)) = (status.running, status.config.as_ref()) {
            println!("Current operation: {}", status.step);
            println!("Completed cycles: {}", status.completed_cycles);
            for line in describe_config(config, &network.native_symbol, &network.share_symbol) {
                println!("{line}");
            }
        }
    }
}

fn print_menu() {
    println!("{BANNER}");
    println!("1. Show Current Balances");
    println!("2. Setup Auto-Swap Configuration");
    println!("3. Start Auto-Swap");
    println!("4. Stop Auto-Swap");
    println!("5. Show Auto-Swap Status");
    println!("6. Exit");
}

async fn prompt<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    question: &str,
) -> Result<Option<String>> {
    print!("{question}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

fn parse_delay(input: &str) -> Option<u64> {
    input.trim().parse().ok()
}

/// Human summary of a cycle configuration, one line per parameter.
pub fn describe_config(config: &CycleConfig, native: &str, share: &str) -> Vec<String> {
    let redeem = match &config.redeem_amount {
        RedeemAmount::All => "ALL".to_string(),
        RedeemAmount::Exact(amount) => format!("{amount} {share}"),
    };
    vec![
        format!("{native} to {share} amount: {} {native}", config.deposit_amount),
        format!("{share} to {native} amount: {redeem}"),
        format!(
            "{native} → {share} delay: {} minutes",
            config.post_deposit_delay_minutes
        ),
        format!(
            "{share} → {native} delay: {} minutes",
            config.post_redeem_delay_minutes
        ),
    ]
}
