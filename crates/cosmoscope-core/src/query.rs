//! Translation of structured transaction queries into the expression grammar
//! accepted by the node's transaction index.
//!
//! The grammar is a flat conjunction of `key op value` clauses joined by
//! ` AND `. String values are single-quoted, integers are bare. The index has
//! no escape sequence for `'`, so values containing one are rejected instead of
//! producing an expression that silently matches nothing.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::BlockHeight;

const CLAUSE_SEPARATOR: &str = " AND ";

/// Search criteria. Every field is optional; present fields are combined with
/// logical AND. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    /// Exact transaction hash. When set, every other field is ignored.
    pub hash: Option<String>,
    pub sender: Option<String>,
    pub recipient: Option<String>,
    /// Exact height; takes precedence over the range bounds.
    pub height: Option<BlockHeight>,
    pub min_height: Option<BlockHeight>,
    pub max_height: Option<BlockHeight>,
}

impl TransactionQuery {
    pub fn by_hash(hash: impl Into<String>) -> Self {
        Self {
            hash: Some(hash.into()),
            ..Self::default()
        }
    }

    pub fn by_sender(sender: impl Into<String>) -> Self {
        Self {
            sender: Some(sender.into()),
            ..Self::default()
        }
    }

    pub fn by_height(height: u64) -> Self {
        Self {
            height: Some(BlockHeight(height)),
            ..Self::default()
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn with_height(mut self, height: u64) -> Self {
        self.height = Some(BlockHeight(height));
        self
    }

    pub fn with_height_range(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_height = min.map(BlockHeight);
        self.max_height = max.map(BlockHeight);
        self
    }

    /// The hash to look up by identity, if one was supplied.
    pub fn lookup_hash(&self) -> Option<&str> {
        non_empty(self.hash.as_deref())
    }

    /// Whether at least one usable criterion is present.
    pub fn has_criteria(&self) -> bool {
        self.lookup_hash().is_some()
            || non_empty(self.sender.as_deref()).is_some()
            || non_empty(self.recipient.as_deref()).is_some()
            || self.height.is_some()
            || self.min_height.is_some()
            || self.max_height.is_some()
    }
}

/// How a query is executed against the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// Identity lookup; no expression is built.
    ByHash(String),
    /// Index search with a rendered expression.
    Expression(String),
}

/// Decide how `query` is executed, validating it before any I/O.
pub fn plan(query: &TransactionQuery) -> Result<SearchPlan, CoreError> {
    match query.lookup_hash() {
        Some(hash) => Ok(SearchPlan::ByHash(hash.to_owned())),
        None => build_expression(query).map(SearchPlan::Expression),
    }
}

/// Render the search expression for `query`.
///
/// Clauses appear in a fixed order: sender, recipient, then either the exact
/// height or the min/max range. The `hash` field is not consulted; callers
/// route hash queries to an identity lookup instead (see [`plan`]).
pub fn build_expression(query: &TransactionQuery) -> Result<String, CoreError> {
    let mut clauses: Vec<String> = Vec::with_capacity(4);

    if let Some(sender) = non_empty(query.sender.as_deref()) {
        clauses.push(format!("message.sender='{}'", quoted_value("sender", sender)?));
    }

    if let Some(recipient) = non_empty(query.recipient.as_deref()) {
        clauses.push(format!(
            "transfer.recipient='{}'",
            quoted_value("recipient", recipient)?
        ));
    }

    match query.height {
        Some(height) => clauses.push(format!("tx.height={height}")),
        None => {
            if let Some(min) = query.min_height {
                clauses.push(format!("tx.height>={min}"));
            }
            if let Some(max) = query.max_height {
                clauses.push(format!("tx.height<={max}"));
            }
        }
    }

    if clauses.is_empty() {
        return Err(CoreError::InvalidQuery(
            "at least one search criterion must be specified".to_owned(),
        ));
    }

    Ok(clauses.join(CLAUSE_SEPARATOR))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn quoted_value<'a>(field: &str, value: &'a str) -> Result<&'a str, CoreError> {
    if value.contains('\'') {
        return Err(CoreError::InvalidQuery(format!(
            "{field} must not contain a single quote"
        )));
    }
    Ok(value)
}
