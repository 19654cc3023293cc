pub mod analyze;
pub mod display;
pub mod error;
pub mod query;
pub mod rpc;
pub mod search;
pub mod session;
#[cfg(test)]
mod test_util;
pub mod types;

pub use error::CoreError;
pub use query::TransactionQuery;
pub use search::TxSearch;
pub use session::LedgerSession;
pub use types::{BlockHeight, DisplaySummary, RawTransaction, TransactionAnalysis};
