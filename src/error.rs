use thiserror::Error;

pub type CreatorResult<T> = Result<T, CreatorError>;

#[derive(Error, Debug)]
pub enum CreatorError {
    /// No candidate RPC endpoint answered the liveness probe.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The language model call itself failed.
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Insufficient funds: balance {balance} ETH is below the required reserve of {required} ETH")]
    InsufficientFunds { balance: String, required: String },

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Background task error: {0}")]
    Task(String),
}

impl CreatorError {
    pub fn connection<T: Into<String>>(msg: T) -> Self {
        CreatorError::Connection(msg.into())
    }

    pub fn synthesis<T: Into<String>>(msg: T) -> Self {
        CreatorError::Synthesis(msg.into())
    }

    pub fn network<T: Into<String>>(msg: T) -> Self {
        CreatorError::Network(msg.into())
    }

    pub fn transaction<T: Into<String>>(msg: T) -> Self {
        CreatorError::Transaction(msg.into())
    }

    pub fn provider<T: Into<String>>(msg: T) -> Self {
        CreatorError::Provider(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        CreatorError::Config(msg.into())
    }

    pub fn store<T: Into<String>>(msg: T) -> Self {
        CreatorError::Store(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        CreatorError::InvalidInput(msg.into())
    }

    pub fn task<T: Into<String>>(msg: T) -> Self {
        CreatorError::Task(msg.into())
    }
}
