//! Receipt log scanning for the staking contract's events.
//!
//! These are pure functions over raw receipt logs so they can be exercised
//! against literal fixtures without a node.

use crate::chain::{DepositFilter, TransferFilter, WithdrawFilter};
use ethers::contract::{EthEvent, parse_log};
use ethers::types::{H256, Log, U256};

/// Result of looking for one event in a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventScan<T> {
    Decoded(T),
    /// A log carried the expected signature but its payload did not decode.
    Malformed(String),
    Missing,
}

impl<T> EventScan<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> EventScan<U> {
        match self {
            EventScan::Decoded(v) => EventScan::Decoded(f(v)),
            EventScan::Malformed(e) => EventScan::Malformed(e),
            EventScan::Missing => EventScan::Missing,
        }
    }

    pub fn decoded(self) -> Option<T> {
        match self {
            EventScan::Decoded(v) => Some(v),
            _ => None,
        }
    }
}

fn decode_first<E, P>(logs: &[Log], matches: P) -> EventScan<E>
where
    E: EthEvent,
    P: Fn(&Log) -> bool,
{
    let signature = E::signature();
    let Some(log) = logs
        .iter()
        .find(|log| log.topics.first() == Some(&signature) && matches(log))
    else {
        return EventScan::Missing;
    };
    match parse_log::<E>(log.clone()) {
        Ok(event) => EventScan::Decoded(event),
        Err(e) => EventScan::Malformed(e.to_string()),
    }
}

/// Shares minted by a deposit.
///
/// Prefers the mint `Transfer` (sender is the zero address) and falls back to
/// the `Deposit` event when the receipt has no mint.
pub fn minted_shares(logs: &[Log]) -> EventScan<U256> {
    let is_mint = |log: &Log| log.topics.get(1) == Some(&H256::zero());
    match decode_first::<TransferFilter, _>(logs, is_mint) {
        EventScan::Missing => decode_first::<DepositFilter, _>(logs, |_| true).map(|d| d.shares),
        other => other.map(|t| t.value),
    }
}

/// Native assets paid out by a redeem, taken from the `Withdraw` event.
pub fn withdrawn_assets(logs: &[Log]) -> EventScan<U256> {
    decode_first::<WithdrawFilter, _>(logs, |_| true).map(|w| w.assets)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPOSIT_RECEIPT_LOGS: &str = r#"[
        {
            "address": "0x3a98250f98dd388c211206983453837c8365bdc1",
            "topics": [
                "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
                "0x0000000000000000000000000000000000000000000000000000000000000000",
                "0x0000000000000000000000007e5f4552091a69125d5dfcb7b8c2659029395bdf"
            ],
            "data": "0x0000000000000000000000000000000000000000000000007ce66c50e2840000",
            "blockHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "blockNumber": "0x10",
            "transactionHash": "0x2222222222222222222222222222222222222222222222222222222222222222",
            "transactionIndex": "0x0",
            "logIndex": "0x0",
            "removed": false
        },
        {
            "address": "0x3a98250f98dd388c211206983453837c8365bdc1",
            "topics": [
                "0xdcbc1c05240f31ff3ad067ef1ee35ce4997762752e3a095284754544f4c709d7",
                "0x0000000000000000000000007e5f4552091a69125d5dfcb7b8c2659029395bdf",
                "0x0000000000000000000000007e5f4552091a69125d5dfcb7b8c2659029395bdf"
            ],
            "data": "0x0000000000000000000000000000000000000000000000008ac7230489e800000000000000000000000000000000000000000000000000007ce66c50e2840000",
            "blockHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "blockNumber": "0x10",
            "transactionHash": "0x2222222222222222222222222222222222222222222222222222222222222222",
            "transactionIndex": "0x0",
            "logIndex": "0x1",
            "removed": false
        }
    ]"#;

    const REDEEM_RECEIPT_LOGS: &str = r#"[
        {
            "address": "0x3a98250f98dd388c211206983453837c8365bdc1",
            "topics": [
                "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
                "0x0000000000000000000000007e5f4552091a69125d5dfcb7b8c2659029395bdf",
                "0x0000000000000000000000000000000000000000000000000000000000000000"
            ],
            "data": "0x0000000000000000000000000000000000000000000000007ce66c50e2840000",
            "blockHash": "0x3333333333333333333333333333333333333333333333333333333333333333",
            "blockNumber": "0x11",
            "transactionHash": "0x4444444444444444444444444444444444444444444444444444444444444444",
            "transactionIndex": "0x2",
            "logIndex": "0x5",
            "removed": false
        },
        {
            "address": "0x3a98250f98dd388c211206983453837c8365bdc1",
            "topics": [
                "0xfbde797d201c681b91056529119e0b02407c7bb96a4a2c75c01fc9667232c8db",
                "0x0000000000000000000000007e5f4552091a69125d5dfcb7b8c2659029395bdf",
                "0x0000000000000000000000007e5f4552091a69125d5dfcb7b8c2659029395bdf",
                "0x0000000000000000000000007e5f4552091a69125d5dfcb7b8c2659029395bdf"
            ],
            "data": "0x00000000000000000000000000000000000000000000000083d6c7aab63600000000000000000000000000000000000000000000000000007ce66c50e2840000",
            "blockHash": "0x3333333333333333333333333333333333333333333333333333333333333333",
            "blockNumber": "0x11",
            "transactionHash": "0x4444444444444444444444444444444444444444444444444444444444444444",
            "transactionIndex": "0x2",
            "logIndex": "0x6",
            "removed": false
        }
    ]"#;

    fn fixture(raw: &str) -> Vec<Log> {
        serde_json::from_str(raw).expect("fixture should parse")
    }

    #[test]
    fn deposit_reports_minted_shares_from_transfer() {
        let logs = fixture(DEPOSIT_RECEIPT_LOGS);
        assert_eq!(
            minted_shares(&logs),
            EventScan::Decoded(U256::from(9_000_000_000_000_000_000u128))
        );
    }

    #[test]
    fn deposit_falls_back_to_deposit_event() {
        let logs = fixture(DEPOSIT_RECEIPT_LOGS);
        assert_eq!(
            minted_shares(&logs[1..]),
            EventScan::Decoded(U256::from(9_000_000_000_000_000_000u128))
        );
    }

    #[test]
    fn burn_transfer_is_not_a_mint() {
        // A redeem receipt burns shares; it must not be read as a deposit.
        let logs = fixture(REDEEM_RECEIPT_LOGS);
        assert_eq!(minted_shares(&logs), EventScan::Missing);
    }

    #[test]
    fn redeem_reports_withdrawn_assets() {
        let logs = fixture(REDEEM_RECEIPT_LOGS);
        assert_eq!(
            withdrawn_assets(&logs),
            EventScan::Decoded(U256::from(9_500_000_000_000_000_000u128))
        );
    }

    #[test]
    fn empty_receipt_has_no_events() {
        assert_eq!(minted_shares(&[]), EventScan::Missing);
        assert_eq!(withdrawn_assets(&[]), EventScan::Missing);
    }

    #[test]
    fn truncated_payload_is_malformed() {
        let mut logs = fixture(REDEEM_RECEIPT_LOGS);
        logs[1].data = vec![0u8; 7].into();
        assert!(matches!(withdrawn_assets(&logs), EventScan::Malformed(_)));
        assert_eq!(withdrawn_assets(&logs).decoded(), None);
    }
}
