use clap::{Args, Parser, Subcommand};

use cosmoscope_core::rpc::ClientConfig;

const DEFAULT_RPC_URL: &str = "https://cosmos-api.cosmdev.com/rpc/atom";

/// Read-only explorer for Cosmos SDK chains. Search and analyze
/// transactions, inspect blocks and balances.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// CometBFT RPC URL of the full node.
    #[arg(long, global = true, default_value = DEFAULT_RPC_URL, env = "COSMOSCOPE_RPC_URL")]
    pub rpc_url: String,

    /// Cosmos REST (LCD) URL, needed for balance lookups.
    #[arg(long, global = true, env = "COSMOSCOPE_REST_URL")]
    pub rest_url: Option<String>,

    /// Maximum outbound requests per second (unlimited when omitted).
    #[arg(long, global = true, env = "COSMOSCOPE_REQUESTS_PER_SECOND")]
    pub requests_per_second: Option<u32>,

    /// Transactions requested per search page (1-100).
    #[arg(long, global = true, default_value = "100")]
    pub page_size: u32,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            rpc_url: self.rpc_url.clone(),
            rest_url: self.rest_url.clone(),
            requests_per_second: self.requests_per_second,
            page_size: self.page_size,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Show chain id, latest block and node status.
    Info {
        /// Skip the node status lookup.
        #[arg(long)]
        basic: bool,
    },

    /// Show a block (latest when no height is given).
    Block {
        #[arg(long)]
        height: Option<u64>,
    },

    /// Show the balances of an account.
    Balance {
        address: String,

        /// Only report this denomination.
        #[arg(long)]
        denom: Option<String>,
    },

    /// Search transactions by criteria.
    Search(SearchArgs),

    /// Look up and analyze a transaction by hash.
    Tx {
        hash: String,
    },

    /// Look up transactions by hash or, for all-digit input, by block height.
    Resolve {
        identifier: String,

        /// Include the full event analysis of each transaction.
        #[arg(long)]
        full: bool,
    },

    /// Transactions sent by an address.
    Address {
        address: String,

        /// Advisory result limit; the node may return more.
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Check that the RPC endpoint is reachable.
    Ping,

    /// Serve the read-only JSON API.
    Serve {
        /// Address to bind the web server to.
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,

        /// Port to listen on.
        #[arg(long, default_value = "3090")]
        port: u16,
    },
}

#[derive(Args)]
pub struct SearchArgs {
    /// Exact transaction hash; other criteria are ignored when set.
    #[arg(long)]
    pub hash: Option<String>,

    #[arg(long)]
    pub sender: Option<String>,

    #[arg(long)]
    pub recipient: Option<String>,

    /// Exact block height; overrides --min-height/--max-height.
    #[arg(long)]
    pub height: Option<u64>,

    #[arg(long)]
    pub min_height: Option<u64>,

    #[arg(long)]
    pub max_height: Option<u64>,

    /// Include the full event analysis of each transaction.
    #[arg(long)]
    pub full: bool,
}
