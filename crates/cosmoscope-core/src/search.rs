//! Transaction search over an injected [`LedgerClient`].
//!
//! `TxSearch` validates a [`TransactionQuery`], routes it to an identity
//! lookup or an index search, and keeps the most recent result set. It issues
//! at most one collaborator call per operation and never retries.
//!
//! The last-results slot is shared by every caller of one instance with
//! last-write-wins semantics; callers that need isolation should use separate
//! instances.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::analyze::analyze;
use crate::display::format_for_display;
use crate::error::CoreError;
use crate::query::{plan, SearchPlan, TransactionQuery};
use crate::rpc::LedgerClient;
use crate::types::{DisplaySummary, RawTransaction, TransactionAnalysis};

const SEARCH_CONTEXT: &str = "error during search";
const LOOKUP_CONTEXT: &str = "error retrieving transaction";

pub struct TxSearch {
    client: Option<Arc<dyn LedgerClient>>,
    last_results: RwLock<Vec<RawTransaction>>,
}

impl TxSearch {
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self {
            client: Some(client),
            last_results: RwLock::new(Vec::new()),
        }
    }

    /// A search service with no client; every lookup fails with
    /// `ClientUnavailable` until [`set_client`](Self::set_client) is called.
    pub fn detached() -> Self {
        Self {
            client: None,
            last_results: RwLock::new(Vec::new()),
        }
    }

    pub fn set_client(&mut self, client: Option<Arc<dyn LedgerClient>>) {
        self.client = client;
    }

    pub fn clear_client(&mut self) {
        self.client = None;
    }

    fn client(&self) -> Result<&dyn LedgerClient, CoreError> {
        self.client.as_deref().ok_or(CoreError::ClientUnavailable)
    }

    /// Execute `query`. Hash queries become an identity lookup; anything else
    /// is rendered to an index expression. The returned set replaces the
    /// cached last results.
    pub async fn search(&self, query: &TransactionQuery) -> Result<Vec<RawTransaction>, CoreError> {
        let plan = plan(query)?;
        let client = self.client()?;

        let results = match plan {
            SearchPlan::ByHash(hash) => lookup(client, &hash).await?,
            SearchPlan::Expression(expression) => {
                debug!(search.expression = %expression, "searching transactions");
                client
                    .search_tx(&expression)
                    .await
                    .map_err(|err| wrap_failure(err, SEARCH_CONTEXT))?
            }
        };

        debug!(search.results = results.len(), "search complete");
        *self.last_results.write().await = results.clone();
        Ok(results)
    }

    /// One-element result when the hash is known, empty otherwise.
    pub async fn find_by_hash(&self, hash: &str) -> Result<Vec<RawTransaction>, CoreError> {
        require_hash(hash)?;
        lookup(self.client()?, hash).await
    }

    /// Transactions sent by `address`.
    ///
    /// `limit` is advisory: the node decides how much to return and no
    /// client-side truncation is applied.
    pub async fn find_by_address(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<RawTransaction>, CoreError> {
        debug!(search.address = address, search.limit = limit, "address lookup");
        self.search(&TransactionQuery::by_sender(address)).await
    }

    pub async fn find_by_height(&self, height: u64) -> Result<Vec<RawTransaction>, CoreError> {
        self.search(&TransactionQuery::by_height(height)).await
    }

    /// Route an identifier typed by a user: all-digit strings are heights,
    /// anything else is a hash.
    ///
    /// Known limitation: an all-digit hash would be treated as a height.
    pub async fn resolve(&self, identifier: &str) -> Result<Vec<RawTransaction>, CoreError> {
        if is_decimal(identifier) {
            let height = identifier.parse::<u64>().map_err(|e| {
                CoreError::InvalidQuery(format!("height `{identifier}` is out of range: {e}"))
            })?;
            self.find_by_height(height).await
        } else {
            self.search(&TransactionQuery::by_hash(identifier)).await
        }
    }

    /// The result set of the most recent successful [`search`](Self::search).
    pub async fn last_results(&self) -> Vec<RawTransaction> {
        self.last_results.read().await.clone()
    }

    pub fn analyze(&self, tx: &RawTransaction) -> TransactionAnalysis {
        analyze(tx)
    }

    pub fn format_for_display(&self, tx: &RawTransaction) -> DisplaySummary {
        format_for_display(tx)
    }
}

fn require_hash(hash: &str) -> Result<(), CoreError> {
    if hash.is_empty() {
        return Err(CoreError::InvalidQuery(
            "transaction hash must not be empty".to_owned(),
        ));
    }
    Ok(())
}

async fn lookup(client: &dyn LedgerClient, hash: &str) -> Result<Vec<RawTransaction>, CoreError> {
    debug!(tx.hash = hash, "looking up transaction");
    let tx = client
        .get_tx(hash)
        .await
        .map_err(|err| wrap_failure(err, LOOKUP_CONTEXT))?;
    Ok(tx.into_iter().collect())
}

fn wrap_failure(err: CoreError, context: &'static str) -> CoreError {
    let err = err.with_context(context);
    warn!(error = %err, "ledger call failed");
    err
}

fn is_decimal(identifier: &str) -> bool {
    !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit())
}
