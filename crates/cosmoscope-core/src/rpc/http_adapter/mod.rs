//! CometBFT JSON-RPC client for Cosmos SDK full nodes.
//!
//! Implements [`LedgerClient`](super::LedgerClient) over JSON-RPC 2.0 using
//! `reqwest`, with optional request rate limiting, paged transaction search,
//! an LRU cache of committed blocks, and bank balance lookups through the
//! node's REST gateway.

mod client;
mod connection;
mod parsing;
mod protocol;

pub use client::HttpLedgerClient;
pub use connection::ClientConfig;
