mod cli;
mod report;
mod server;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde::Serialize;

use cosmoscope_core::rpc::ClientConfig;
use cosmoscope_core::types::BlockHeight;
use cosmoscope_core::{LedgerSession, TransactionQuery};

use cli::{Cli, Command, SearchArgs};
use report::{TxListReport, TxReport};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let config = args.client_config();
    run(args.command, &config).await
}

/// Dispatch one subcommand. Every command except `ping` connects and
/// verifies the endpoint first.
async fn run(command: Command, config: &ClientConfig) -> eyre::Result<()> {
    match command {
        Command::Ping => {
            let outcome = LedgerSession::test_connection(config).await;
            print_json(&outcome)
        }
        Command::Info { basic } => {
            let session = connect(config).await?;
            let info = if basic {
                session.basic_info().await?
            } else {
                session.blockchain_info().await?
            };
            print_json(&info)
        }
        Command::Block { height } => {
            let session = connect(config).await?;
            let block = session.get_block(height.map(BlockHeight)).await?;
            print_json(&block)
        }
        Command::Balance { address, denom } => {
            let session = connect(config).await?;
            let balances = session.get_balance(&address, denom.as_deref()).await?;
            print_json(&balances)
        }
        Command::Search(search_args) => {
            let session = connect(config).await?;
            let full = search_args.full;
            let txs = session
                .transactions()
                .search(&query_from_args(search_args))
                .await?;
            print_json(&TxListReport::new(&txs, full))
        }
        Command::Tx { hash } => {
            let session = connect(config).await?;
            let txs = session.transactions().find_by_hash(&hash).await?;
            let tx = txs
                .first()
                .ok_or_else(|| eyre!("transaction not found: {hash}"))?;
            print_json(&TxReport::new(tx, true))
        }
        Command::Resolve { identifier, full } => {
            let session = connect(config).await?;
            let txs = session.transactions().resolve(&identifier).await?;
            print_json(&TxListReport::new(&txs, full))
        }
        Command::Address { address, limit } => {
            let session = connect(config).await?;
            let txs = session
                .transactions()
                .find_by_address(&address, limit)
                .await?;
            print_json(&TxListReport::new(&txs, false))
        }
        Command::Serve { bind, port } => {
            let session = connect(config).await?;
            let state = server::AppState::new(session);
            let bind_addr = format!("{bind}:{port}");
            let origin = format!("http://{bind}:{port}");
            let router = server::build_router(state, &origin);

            if bind == "0.0.0.0" {
                tracing::warn!("server is bound to 0.0.0.0; it is accessible from the network");
            }

            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .context("bind TCP listener")?;

            tracing::info!("listening on {bind_addr}");
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("run HTTP server")?;
            Ok(())
        }
    }
}

async fn connect(config: &ClientConfig) -> eyre::Result<LedgerSession> {
    let mut session = LedgerSession::new();
    session.connect(config).await.map_err(|err| {
        let message = format_rpc_connect_error(&config.rpc_url, &err.to_string());
        eyre!(message).wrap_err("while attempting to connect to the ledger RPC endpoint")
    })?;
    Ok(session)
}

fn query_from_args(args: SearchArgs) -> TransactionQuery {
    TransactionQuery {
        hash: args.hash,
        sender: args.sender,
        recipient: args.recipient,
        height: args.height.map(BlockHeight),
        min_height: args.min_height.map(BlockHeight),
        max_height: args.max_height.map(BlockHeight),
    }
}

fn print_json(value: &impl Serialize) -> eyre::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{rendered}");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn format_rpc_connect_error(rpc_url: &str, source_error: &str) -> String {
    let mut lines = vec![
        format!("could not connect to RPC endpoint `{rpc_url}`"),
        format!("RPC error: {source_error}"),
    ];

    if source_error.contains("dns error") || source_error.contains("failed to lookup address") {
        lines.push(
            "hint: hostname resolution failed; verify the endpoint hostname and your DNS/network"
                .into(),
        );
    } else if source_error.contains("tls") || source_error.contains("certificate") {
        lines.push(
            "hint: TLS handshake failed; verify certificate trust and that the endpoint uses HTTPS"
                .into(),
        );
    } else if source_error.contains("HTTP 404") {
        lines.push(
            "hint: endpoint path is invalid; the URL must point at the CometBFT RPC root".into(),
        );
    } else if source_error.contains("HTTP 401") || source_error.contains("HTTP 403") {
        lines.push("hint: the endpoint rejected the request; check access credentials".into());
    } else if source_error.contains("error sending request for url") {
        lines.push("hint: request could not be sent; verify URL format, network access, and endpoint reachability".into());
    }

    lines.join("\n")
}
