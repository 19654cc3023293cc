use serde::Serialize;

use cosmoscope_core::analyze::analyze;
use cosmoscope_core::display::format_for_display;
use cosmoscope_core::types::{DisplaySummary, RawTransaction, TransactionAnalysis};

// ==============================================================================
// Transaction Reports
// ==============================================================================

/// Output shape shared by the CLI and the JSON API.
#[derive(Debug, Serialize)]
pub(crate) struct TxReport {
    pub(crate) summary: DisplaySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) analysis: Option<TransactionAnalysis>,
}

impl TxReport {
    pub(crate) fn new(tx: &RawTransaction, full: bool) -> Self {
        Self {
            summary: format_for_display(tx),
            analysis: full.then(|| analyze(tx)),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TxListReport {
    pub(crate) count: usize,
    pub(crate) transactions: Vec<TxReport>,
}

impl TxListReport {
    pub(crate) fn new(txs: &[RawTransaction], full: bool) -> Self {
        Self {
            count: txs.len(),
            transactions: txs.iter().map(|tx| TxReport::new(tx, full)).collect(),
        }
    }
}
