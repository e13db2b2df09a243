//! Core library for the staking-cycle-bot project.
//!
//! The binary (`main.rs`) wires the `ethers` chain client into the staking
//! operations, the cycle controller and the operator menu defined here.

pub mod chain;
pub mod cli;
pub mod config;
pub mod cycle;
pub mod errors;
pub mod models;
pub mod staking;
pub mod utils;

#[cfg(test)]
mod testing;
