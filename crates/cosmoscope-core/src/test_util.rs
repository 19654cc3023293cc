//! Shared test helpers for `cosmoscope-core` unit tests.
//!
//! Builders for indexed transactions and their events so that tests across
//! modules construct fixtures the same way.

use crate::types::{Attribute, BlockHeight, Event, RawTransaction};

/// Build an event of the given type from `(key, value)` pairs, in order.
pub fn event(kind: &str, attributes: &[(&str, &str)]) -> Event {
    Event {
        kind: kind.to_owned(),
        attributes: attributes
            .iter()
            .map(|(key, value)| Attribute::new(*key, *value))
            .collect(),
    }
}

/// A `message` event carrying an `action` and a `sender`.
pub fn message_event(action: &str, sender: &str) -> Event {
    event(
        "message",
        &[("action", action), ("sender", sender), ("module", "bank")],
    )
}

/// A complete `transfer` event.
pub fn transfer_event(sender: &str, recipient: &str, amount: &str) -> Event {
    event(
        "transfer",
        &[
            ("recipient", recipient),
            ("sender", sender),
            ("amount", amount),
        ],
    )
}

/// Build a successful `RawTransaction` with sane gas defaults.
/// Override individual fields after construction when needed.
pub fn make_raw_tx(hash: &str, height: u64, events: Vec<Event>) -> RawTransaction {
    RawTransaction {
        hash: hash.to_owned(),
        height: BlockHeight(height),
        code: 0,
        gas_used: 21_000,
        gas_wanted: 30_000,
        events,
    }
}

/// A single-send transaction: one message event and one matching transfer.
pub fn bank_send_tx(hash: &str, height: u64, sender: &str, recipient: &str) -> RawTransaction {
    make_raw_tx(
        hash,
        height,
        vec![
            event("tx", &[("fee", "500uatom")]),
            message_event("/cosmos.bank.v1beta1.MsgSend", sender),
            transfer_event(sender, recipient, "1000uatom"),
        ],
    )
}
