//! Connection lifecycle and chain-level lookups.
//!
//! A [`LedgerSession`] owns at most one ledger client at a time. Chain, block
//! and balance lookups are thin pass-throughs that fail with
//! `ClientUnavailable` while disconnected.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::rpc::{BlockInfo, ChainInfo, ClientConfig, HttpLedgerClient, LedgerClient};
use crate::search::TxSearch;
use crate::types::{BlockHeight, Coin};

/// Balance lookup result: one denomination, or every denomination held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Balances {
    Single(Coin),
    All(Vec<Coin>),
}

/// Outcome of a throwaway connection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionProbe {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Default)]
pub struct LedgerSession {
    client: Option<Arc<dyn LedgerClient>>,
}

impl LedgerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect to the node described by `config`.
    ///
    /// The connection is verified by fetching the chain id. On failure the
    /// session is left disconnected.
    pub async fn connect(&mut self, config: &ClientConfig) -> Result<String, CoreError> {
        debug!(rpc.url = %config.rpc_url, "connecting");
        self.client = None;

        let client: Arc<dyn LedgerClient> = Arc::new(HttpLedgerClient::new(config)?);
        let chain_id = client.get_chain_id().await.map_err(|err| {
            let err = err.with_context("error during connection");
            warn!(rpc.url = %config.rpc_url, error = %err, "connection failed");
            err
        })?;

        info!(rpc.url = %config.rpc_url, chain_id = %chain_id, "connected");
        self.client = Some(client);
        Ok(chain_id)
    }

    /// Use an already constructed client.
    pub fn attach(&mut self, client: Arc<dyn LedgerClient>) {
        self.client = Some(client);
    }

    pub fn disconnect(&mut self) {
        if self.client.take().is_some() {
            info!("disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Result<Arc<dyn LedgerClient>, CoreError> {
        self.client.clone().ok_or(CoreError::ClientUnavailable)
    }

    /// A search service bound to this session's current client.
    pub fn transactions(&self) -> TxSearch {
        let mut search = TxSearch::detached();
        search.set_client(self.client.clone());
        search
    }

    /// Chain id, tip height and latest block fetched concurrently, plus a
    /// best-effort node status.
    pub async fn blockchain_info(&self) -> Result<ChainInfo, CoreError> {
        let client = self.client()?;

        let (chain_id, height, block) = futures::try_join!(
            client.get_chain_id(),
            client.get_height(),
            client.get_block(None),
        )
        .map_err(|err| chain_failure(err, "error retrieving information"))?;

        let node_info = match client.get_node_status().await {
            Ok(status) => status,
            Err(err) => {
                warn!(error = %err, "unable to retrieve node info");
                None
            }
        };

        Ok(ChainInfo {
            chain_id,
            latest_block_height: height,
            latest_block_time: block.time,
            latest_block_hash: block.hash,
            node_info,
        })
    }

    /// Chain id, tip height and latest block, fetched one after another and
    /// without node status.
    pub async fn basic_info(&self) -> Result<ChainInfo, CoreError> {
        let client = self.client()?;
        let context = "error retrieving information";

        let chain_id = client
            .get_chain_id()
            .await
            .map_err(|err| chain_failure(err, context))?;
        debug!(chain_id = %chain_id, "chain id");
        let height = client
            .get_height()
            .await
            .map_err(|err| chain_failure(err, context))?;
        debug!(height = %height, "height");
        let block = client
            .get_block(None)
            .await
            .map_err(|err| chain_failure(err, context))?;
        debug!(block.height = %block.height, "latest block");

        Ok(ChainInfo {
            chain_id,
            latest_block_height: height,
            latest_block_time: block.time,
            latest_block_hash: block.hash,
            node_info: None,
        })
    }

    pub async fn get_block(&self, height: Option<BlockHeight>) -> Result<BlockInfo, CoreError> {
        self.client()?
            .get_block(height)
            .await
            .map_err(|err| chain_failure(err, "error retrieving block"))
    }

    /// One denomination when `denom` is given, every held denomination otherwise.
    pub async fn get_balance(
        &self,
        address: &str,
        denom: Option<&str>,
    ) -> Result<Balances, CoreError> {
        let client = self.client()?;
        let context = "error retrieving balance";
        match denom {
            Some(denom) => client
                .get_balance(address, denom)
                .await
                .map(Balances::Single)
                .map_err(|err| chain_failure(err, context)),
            None => client
                .get_all_balances(address)
                .await
                .map(Balances::All)
                .map_err(|err| chain_failure(err, context)),
        }
    }

    /// Try to reach `config` with a temporary client. Never fails; the outcome
    /// is reported in the probe.
    pub async fn test_connection(config: &ClientConfig) -> ConnectionProbe {
        debug!(rpc.url = %config.rpc_url, "testing connection");
        let result = match HttpLedgerClient::new(config) {
            Ok(client) => client.get_chain_id().await,
            Err(err) => Err(err),
        };

        match result {
            Ok(chain_id) => ConnectionProbe {
                success: true,
                chain_id: Some(chain_id),
                error: None,
            },
            Err(err) => {
                warn!(rpc.url = %config.rpc_url, error = %err, "connection test failed");
                ConnectionProbe {
                    success: false,
                    chain_id: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

fn chain_failure(err: CoreError, context: &'static str) -> CoreError {
    let err = err.with_context(context);
    warn!(error = %err, "ledger call failed");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::{MockCall, MockLedger};
    use crate::rpc::NodeStatus;
    use crate::TransactionQuery;

    fn block(height: u64) -> BlockInfo {
        BlockInfo {
            hash: format!("HASH{height}"),
            height: BlockHeight(height),
            time: "2024-01-01T00:00:00Z".into(),
            chain_id: "testchain-1".into(),
            proposer_address: "PROPOSER".into(),
            tx_count: 0,
        }
    }

    fn node_status() -> NodeStatus {
        NodeStatus {
            moniker: "node0".into(),
            network: "testchain-1".into(),
            version: "0.38.0".into(),
            latest_block_height: BlockHeight(11),
            catching_up: false,
        }
    }

    fn session_with(ledger: &Arc<MockLedger>) -> LedgerSession {
        let mut session = LedgerSession::new();
        session.attach(ledger.clone());
        session
    }

    #[tokio::test]
    async fn disconnected_session_reports_client_unavailable() {
        let session = LedgerSession::new();
        assert!(!session.is_connected());
        assert!(matches!(
            session.blockchain_info().await,
            Err(CoreError::ClientUnavailable)
        ));
        assert!(matches!(
            session.get_block(None).await,
            Err(CoreError::ClientUnavailable)
        ));
        assert!(matches!(
            session.get_balance("cosmos1abc", None).await,
            Err(CoreError::ClientUnavailable)
        ));
        assert!(matches!(
            session
                .transactions()
                .search(&TransactionQuery::by_height(1))
                .await,
            Err(CoreError::ClientUnavailable)
        ));
    }

    #[tokio::test]
    async fn blockchain_info_includes_node_status() {
        let ledger = Arc::new(
            MockLedger::builder()
                .with_block(block(10))
                .with_block(block(11))
                .with_node_status(node_status())
                .build(),
        );
        let info = session_with(&ledger)
            .blockchain_info()
            .await
            .expect("info succeeds");

        assert_eq!(info.chain_id, "testchain-1");
        assert_eq!(*info.latest_block_height, 11);
        assert_eq!(info.latest_block_hash, "HASH11");
        assert_eq!(info.node_info, Some(node_status()));
    }

    #[tokio::test]
    async fn node_status_failure_is_soft() {
        let ledger = Arc::new(
            MockLedger::builder()
                .with_block(block(3))
                .with_failing_node_status()
                .build(),
        );
        let info = session_with(&ledger)
            .blockchain_info()
            .await
            .expect("primary lookup still succeeds");
        assert_eq!(info.node_info, None);
        assert_eq!(*info.latest_block_height, 3);
    }

    #[tokio::test]
    async fn basic_info_fetches_in_order_without_status() {
        let ledger = Arc::new(MockLedger::builder().with_block(block(4)).build());
        let info = session_with(&ledger)
            .basic_info()
            .await
            .expect("info succeeds");

        assert_eq!(info.node_info, None);
        assert_eq!(
            ledger.calls(),
            vec![
                MockCall::GetChainId,
                MockCall::GetHeight,
                MockCall::GetBlock(None)
            ]
        );
    }

    #[tokio::test]
    async fn chain_failures_are_wrapped() {
        let ledger = Arc::new(MockLedger::builder().failing().build());
        let err = session_with(&ledger)
            .get_block(Some(BlockHeight(1)))
            .await
            .expect_err("ledger failure");
        assert!(err.to_string().starts_with("error retrieving block: "));
    }

    #[tokio::test]
    async fn balance_with_and_without_denom() {
        let coins = vec![
            Coin {
                denom: "uatom".into(),
                amount: "10".into(),
            },
            Coin {
                denom: "uosmo".into(),
                amount: "20".into(),
            },
        ];
        let ledger = Arc::new(
            MockLedger::builder()
                .with_balances("cosmos1abc", coins.clone())
                .build(),
        );
        let session = session_with(&ledger);

        let single = session
            .get_balance("cosmos1abc", Some("uosmo"))
            .await
            .expect("balance succeeds");
        assert_eq!(single, Balances::Single(coins[1].clone()));

        let all = session
            .get_balance("cosmos1abc", None)
            .await
            .expect("balances succeed");
        assert_eq!(all, Balances::All(coins));
    }

    #[tokio::test]
    async fn disconnect_drops_client() {
        let ledger = Arc::new(MockLedger::builder().build());
        let mut session = session_with(&ledger);
        assert!(session.is_connected());

        session.disconnect();
        assert!(!session.is_connected());
        assert!(matches!(session.client(), Err(CoreError::ClientUnavailable)));
    }

    #[tokio::test]
    async fn connect_with_invalid_url_stays_disconnected() {
        let mut session = LedgerSession::new();
        let err = session
            .connect(&ClientConfig::new("ftp://example.com"))
            .await
            .expect_err("invalid scheme");
        assert!(matches!(err, CoreError::InvalidConfig(_)));
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_connection_reports_failure_without_erroring() {
        let probe = LedgerSession::test_connection(&ClientConfig::new("not a url")).await;
        assert!(!probe.success);
        assert!(probe.chain_id.is_none());
        assert!(probe.error.is_some());
    }
}
