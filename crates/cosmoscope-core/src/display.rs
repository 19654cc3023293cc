use crate::analyze::analyze;
use crate::types::{DisplaySummary, RawTransaction, TxStatus, NOT_AVAILABLE};

/// Reduce a transaction to the minimal view shown in listings.
///
/// Timestamp and fee are not part of an indexed transaction and are always
/// reported as unavailable.
#[must_use]
pub fn format_for_display(tx: &RawTransaction) -> DisplaySummary {
    let analysis = analyze(tx);

    DisplaySummary {
        hash: analysis.hash,
        height: analysis.height,
        status: TxStatus::from_code(tx.code),
        gas_used: format!("{}/{}", analysis.gas_used, analysis.gas_wanted),
        message_count: analysis.messages.len(),
        transfer_count: analysis.transfers.len(),
        timestamp: NOT_AVAILABLE.to_owned(),
        fee: None,
    }
}
