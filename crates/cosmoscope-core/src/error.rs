#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("ledger client not connected")]
    ClientUnavailable,

    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: Box<CoreError>,
    },

    #[error("RPC communication failure: {0}")]
    Rpc(#[from] RpcError),

    #[error("invalid ledger data: {0}")]
    InvalidData(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl CoreError {
    /// Wrap a collaborator failure with a human-readable context.
    ///
    /// Errors raised before any I/O (`InvalidQuery`, `InvalidConfig`,
    /// `ClientUnavailable`) and errors that already carry a context pass
    /// through unchanged.
    pub fn with_context(self, context: &'static str) -> Self {
        match self {
            Self::InvalidQuery(_)
            | Self::InvalidConfig(_)
            | Self::ClientUnavailable
            | Self::Transport { .. } => self,
            other => Self::Transport {
                context,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping any `Transport` context wrappers.
    pub fn root(&self) -> &CoreError {
        match self {
            Self::Transport { source, .. } => source.root(),
            other => other,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("server error {code}: {message}")]
    ServerError {
        code: i64,
        message: String,
        data: Option<String>,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
