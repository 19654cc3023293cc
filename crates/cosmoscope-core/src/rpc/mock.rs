use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{CoreError, RpcError};
use crate::types::{BlockHeight, Coin, RawTransaction};

use super::types::{BlockInfo, NodeStatus};
use super::LedgerClient;

/// A collaborator call observed by [`MockLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    GetTx(String),
    SearchTx(String),
    GetChainId,
    GetHeight,
    GetBlock(Option<BlockHeight>),
    GetBalance(String, String),
    GetAllBalances(String),
    GetNodeStatus,
}

/// A mock ledger backend for testing. Returns canned data populated via the
/// builder pattern and records every call it receives.
pub struct MockLedger {
    transactions: HashMap<String, RawTransaction>,
    searches: HashMap<String, Vec<RawTransaction>>,
    blocks: HashMap<BlockHeight, BlockInfo>,
    balances: HashMap<String, Vec<Coin>>,
    chain_id: String,
    node_status: Option<NodeStatus>,
    fail_node_status: bool,
    failing: bool,
    calls: Mutex<Vec<MockCall>>,
}

impl MockLedger {
    pub fn builder() -> MockLedgerBuilder {
        MockLedgerBuilder {
            transactions: HashMap::new(),
            searches: HashMap::new(),
            blocks: HashMap::new(),
            balances: HashMap::new(),
            chain_id: "testchain-1".into(),
            node_status: None,
            fail_node_status: false,
            failing: false,
        }
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    fn record(&self, call: MockCall) -> Result<(), CoreError> {
        self.calls.lock().expect("mock call log poisoned").push(call);
        if self.failing {
            return Err(CoreError::Rpc(RpcError::ServerError {
                code: -32603,
                message: "Internal error".into(),
                data: Some("mock ledger failure".into()),
            }));
        }
        Ok(())
    }

    fn latest_block(&self) -> Option<&BlockInfo> {
        self.blocks.values().max_by_key(|block| block.height)
    }
}

pub struct MockLedgerBuilder {
    transactions: HashMap<String, RawTransaction>,
    searches: HashMap<String, Vec<RawTransaction>>,
    blocks: HashMap<BlockHeight, BlockInfo>,
    balances: HashMap<String, Vec<Coin>>,
    chain_id: String,
    node_status: Option<NodeStatus>,
    fail_node_status: bool,
    failing: bool,
}

impl MockLedgerBuilder {
    pub fn with_tx(mut self, tx: RawTransaction) -> Self {
        self.transactions.insert(tx.hash.clone(), tx);
        self
    }

    /// Results returned for an exact search expression.
    pub fn with_search(mut self, expression: &str, results: Vec<RawTransaction>) -> Self {
        self.searches.insert(expression.to_owned(), results);
        self
    }

    pub fn with_block(mut self, block: BlockInfo) -> Self {
        self.blocks.insert(block.height, block);
        self
    }

    pub fn with_balances(mut self, address: &str, coins: Vec<Coin>) -> Self {
        self.balances.insert(address.to_owned(), coins);
        self
    }

    pub fn with_chain_id(mut self, chain_id: &str) -> Self {
        self.chain_id = chain_id.to_owned();
        self
    }

    pub fn with_node_status(mut self, status: NodeStatus) -> Self {
        self.node_status = Some(status);
        self
    }

    /// Make only the node status lookup fail.
    pub fn with_failing_node_status(mut self) -> Self {
        self.fail_node_status = true;
        self
    }

    /// Make every call fail with a server error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn build(self) -> MockLedger {
        MockLedger {
            transactions: self.transactions,
            searches: self.searches,
            blocks: self.blocks,
            balances: self.balances,
            chain_id: self.chain_id,
            node_status: self.node_status,
            fail_node_status: self.fail_node_status,
            failing: self.failing,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn get_tx(&self, hash: &str) -> Result<Option<RawTransaction>, CoreError> {
        self.record(MockCall::GetTx(hash.to_owned()))?;
        Ok(self.transactions.get(hash).cloned())
    }

    async fn search_tx(&self, expression: &str) -> Result<Vec<RawTransaction>, CoreError> {
        self.record(MockCall::SearchTx(expression.to_owned()))?;
        Ok(self.searches.get(expression).cloned().unwrap_or_default())
    }

    async fn get_chain_id(&self) -> Result<String, CoreError> {
        self.record(MockCall::GetChainId)?;
        Ok(self.chain_id.clone())
    }

    async fn get_height(&self) -> Result<BlockHeight, CoreError> {
        self.record(MockCall::GetHeight)?;
        Ok(self
            .latest_block()
            .map(|block| block.height)
            .unwrap_or_default())
    }

    async fn get_block(&self, height: Option<BlockHeight>) -> Result<BlockInfo, CoreError> {
        self.record(MockCall::GetBlock(height))?;
        let block = match height {
            Some(height) => self.blocks.get(&height),
            None => self.latest_block(),
        };
        block
            .cloned()
            .ok_or_else(|| CoreError::InvalidData("block not found".into()))
    }

    async fn get_balance(&self, address: &str, denom: &str) -> Result<Coin, CoreError> {
        self.record(MockCall::GetBalance(address.to_owned(), denom.to_owned()))?;
        let amount = self
            .balances
            .get(address)
            .and_then(|coins| coins.iter().find(|coin| coin.denom == denom))
            .map_or_else(|| "0".to_owned(), |coin| coin.amount.clone());
        Ok(Coin {
            denom: denom.to_owned(),
            amount,
        })
    }

    async fn get_all_balances(&self, address: &str) -> Result<Vec<Coin>, CoreError> {
        self.record(MockCall::GetAllBalances(address.to_owned()))?;
        Ok(self.balances.get(address).cloned().unwrap_or_default())
    }

    async fn get_node_status(&self) -> Result<Option<NodeStatus>, CoreError> {
        self.record(MockCall::GetNodeStatus)?;
        if self.fail_node_status {
            return Err(CoreError::InvalidData("status unavailable".into()));
        }
        Ok(self.node_status.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[tokio::test]
    async fn unknown_search_returns_empty_and_is_recorded() {
        let ledger = MockLedger::builder().build();
        let results = ledger.search_tx("tx.height=1").await.unwrap();
        assert!(results.is_empty());
        assert_eq!(
            ledger.calls(),
            vec![MockCall::SearchTx("tx.height=1".into())]
        );
    }

    #[tokio::test]
    async fn balance_for_missing_denom_is_zero() {
        let ledger = MockLedger::builder()
            .with_balances(
                "cosmos1abc",
                vec![Coin {
                    denom: "uatom".into(),
                    amount: "42".into(),
                }],
            )
            .build();

        let atom = ledger.get_balance("cosmos1abc", "uatom").await.unwrap();
        assert_eq!(atom.amount, "42");
        let osmo = ledger.get_balance("cosmos1abc", "uosmo").await.unwrap();
        assert_eq!(osmo.amount, "0");
    }

    #[tokio::test]
    async fn failing_mode_still_records_calls() {
        let ledger = MockLedger::builder()
            .with_tx(make_raw_tx("CC01", 1, Vec::new()))
            .failing()
            .build();

        assert!(ledger.get_tx("CC01").await.is_err());
        assert_eq!(ledger.calls(), vec![MockCall::GetTx("CC01".into())]);
    }
}
