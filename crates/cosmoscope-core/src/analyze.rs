//! Decoding of a transaction's event log into typed messages and transfers.
//!
//! Each recognized event type has a small, closed table of attribute keys it
//! reads. Attributes with any other key are ignored. A recognized key that
//! repeats within one event overwrites the earlier value. Missing keys leave
//! the corresponding field empty; decoding never fails.

use crate::types::{Event, RawTransaction, TransactionAnalysis, TransactionMessage, Transfer};

const MESSAGE_EVENT: &str = "message";
const TRANSFER_EVENT: &str = "transfer";

// ==============================================================================
// Decoding Tables
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageKey {
    Action,
}

impl MessageKey {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "action" => Some(Self::Action),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransferKey {
    Sender,
    Recipient,
    Amount,
}

impl TransferKey {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "sender" => Some(Self::Sender),
            "recipient" => Some(Self::Recipient),
            "amount" => Some(Self::Amount),
            _ => None,
        }
    }
}

// ==============================================================================
// Analysis
// ==============================================================================

/// Derive messages and transfers from `tx.events`.
///
/// Both projections keep the relative order of their source events. The
/// original event sequence is carried through unchanged.
#[must_use]
pub fn analyze(tx: &RawTransaction) -> TransactionAnalysis {
    let mut messages = Vec::new();
    let mut transfers = Vec::new();

    for event in &tx.events {
        match event.kind.as_str() {
            MESSAGE_EVENT => messages.push(decode_message(event)),
            TRANSFER_EVENT => {
                let transfer = decode_transfer(event);
                if is_attributed(&transfer) {
                    transfers.push(transfer);
                }
            }
            _ => {}
        }
    }

    TransactionAnalysis {
        hash: tx.hash.clone(),
        height: tx.height,
        gas_used: tx.gas_used,
        gas_wanted: tx.gas_wanted,
        events: tx.events.clone(),
        messages,
        transfers,
        fees: None,
    }
}

fn decode_message(event: &Event) -> TransactionMessage {
    let mut kind = String::new();
    for attr in &event.attributes {
        if let Some(MessageKey::Action) = MessageKey::parse(&attr.key) {
            kind.clone_from(&attr.value);
        }
    }

    TransactionMessage {
        kind,
        content: event.attributes.clone(),
    }
}

fn decode_transfer(event: &Event) -> Transfer {
    let mut transfer = Transfer::default();
    for attr in &event.attributes {
        let slot = match TransferKey::parse(&attr.key) {
            Some(TransferKey::Sender) => &mut transfer.sender,
            Some(TransferKey::Recipient) => &mut transfer.recipient,
            Some(TransferKey::Amount) => &mut transfer.amount,
            None => continue,
        };
        slot.clone_from(&attr.value);
    }
    transfer
}

/// A transfer is only meaningful when both parties are known.
fn is_attributed(transfer: &Transfer) -> bool {
    !transfer.sender.is_empty() && !transfer.recipient.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use crate::types::Attribute;

    #[test]
    fn bank_send_yields_one_message_and_one_transfer() {
        let tx = bank_send_tx("AA01", 7, "cosmos1from", "cosmos1to");
        let analysis = analyze(&tx);

        assert_eq!(analysis.hash, "AA01");
        assert_eq!(*analysis.height, 7);
        assert_eq!(analysis.events, tx.events);
        assert_eq!(analysis.messages.len(), 1);
        assert_eq!(analysis.messages[0].kind, "/cosmos.bank.v1beta1.MsgSend");
        assert_eq!(analysis.messages[0].content, tx.events[1].attributes);
        assert_eq!(
            analysis.transfers,
            vec![Transfer {
                sender: "cosmos1from".into(),
                recipient: "cosmos1to".into(),
                amount: "1000uatom".into(),
            }]
        );
        assert_eq!(analysis.fees, None);
    }

    #[test]
    fn message_without_action_keeps_empty_type() {
        let tx = make_raw_tx(
            "AA02",
            1,
            vec![event("message", &[("module", "bank"), ("sender", "cosmos1x")])],
        );
        let analysis = analyze(&tx);

        assert_eq!(analysis.messages.len(), 1);
        assert_eq!(analysis.messages[0].kind, "");
        assert_eq!(
            analysis.messages[0].content,
            vec![
                Attribute::new("module", "bank"),
                Attribute::new("sender", "cosmos1x"),
            ]
        );
    }

    #[test]
    fn transfer_missing_recipient_is_dropped() {
        let tx = make_raw_tx(
            "AA03",
            1,
            vec![event(
                "transfer",
                &[("sender", "cosmos1from"), ("amount", "5uatom")],
            )],
        );
        assert!(analyze(&tx).transfers.is_empty());
    }

    #[test]
    fn transfer_missing_sender_is_dropped() {
        let tx = make_raw_tx(
            "AA04",
            1,
            vec![event("transfer", &[("recipient", "cosmos1to")])],
        );
        assert!(analyze(&tx).transfers.is_empty());
    }

    #[test]
    fn transfer_without_amount_is_kept() {
        let tx = make_raw_tx(
            "AA05",
            1,
            vec![event(
                "transfer",
                &[("sender", "cosmos1from"), ("recipient", "cosmos1to")],
            )],
        );
        let transfers = analyze(&tx).transfers;
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].amount, "");
    }

    #[test]
    fn projections_preserve_event_order() {
        let tx = make_raw_tx(
            "AA06",
            1,
            vec![
                transfer_event("a", "b", "1uatom"),
                message_event("first", "a"),
                event("coin_spent", &[("spender", "a")]),
                transfer_event("c", "d", "2uatom"),
                message_event("second", "c"),
                transfer_event("e", "f", "3uatom"),
            ],
        );
        let analysis = analyze(&tx);

        let kinds: Vec<_> = analysis.messages.iter().map(|m| m.kind.as_str()).collect();
        assert_eq!(kinds, ["first", "second"]);
        let senders: Vec<_> = analysis
            .transfers
            .iter()
            .map(|t| t.sender.as_str())
            .collect();
        assert_eq!(senders, ["a", "c", "e"]);
    }

    #[test]
    fn repeated_key_last_value_wins_and_unknown_keys_are_ignored() {
        let tx = make_raw_tx(
            "AA07",
            1,
            vec![
                event(
                    "message",
                    &[("action", "old"), ("msg_index", "0"), ("action", "new")],
                ),
                event(
                    "transfer",
                    &[
                        ("sender", "x"),
                        ("recipient", "y"),
                        ("memo", "ignored"),
                        ("recipient", "z"),
                    ],
                ),
            ],
        );
        let analysis = analyze(&tx);
        assert_eq!(analysis.messages[0].kind, "new");
        assert_eq!(analysis.transfers[0].recipient, "z");
    }

    #[test]
    fn analyze_is_pure() {
        let tx = bank_send_tx("AA08", 9, "cosmos1from", "cosmos1to");
        assert_eq!(analyze(&tx), analyze(&tx));
    }

    #[test]
    fn transaction_without_events() {
        let analysis = analyze(&make_raw_tx("AA09", 1, Vec::new()));
        assert!(analysis.messages.is_empty());
        assert!(analysis.transfers.is_empty());
        assert!(analysis.events.is_empty());
    }
}
