//! Error types for the proxy core.
//!
//! Every failure the proxy can recover from has a typed variant here. The
//! dispatcher turns any of them into an `info string` diagnostic and keeps
//! the session alive, so none of these are fatal to the process.

use std::path::PathBuf;

/// Configuration errors (bad option name/value, unreadable config file)
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Option {0} requires a value")]
    MissingValue(String),

    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },

    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Failed to read config file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

/// Errors while building a session from a `position` command
#[derive(thiserror::Error, Debug)]
pub enum PositionError {
    #[error("Invalid FEN '{fen}': {reason}")]
    Fen { fen: String, reason: String },

    /// Replay stopped at `index`; earlier moves stay applied
    #[error("Move #{index} '{token}' rejected: {reason}")]
    MoveRejected {
        index: usize,
        token: String,
        reason: String,
    },
}

/// Errors from the wrapped engine
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("Engine not available: {0}")]
    Unavailable(String),

    #[error("Engine exited unexpectedly")]
    Disconnected,

    #[error("Engine protocol error: {0}")]
    Protocol(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// The engine handle is unusable and a fresh launch is needed
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, GatewayError::Disconnected | GatewayError::Io(_))
    }
}

/// Errors raised by an attacking evaluator for a single candidate
#[derive(thiserror::Error, Debug)]
pub enum EvalError {
    #[error("Game replay failed: {0}")]
    Replay(String),

    #[error("Player {0} does not appear in the game headers")]
    UnknownPlayer(String),

    #[error("Game has no moves for the evaluated player")]
    EmptyGame,
}

/// Top-level error returned by command handlers
#[derive(thiserror::Error, Debug)]
pub enum ProxyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Position(#[from] PositionError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Malformed command line
    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for handler-level operations
pub type ProxyResult<T> = Result<T, ProxyError>;
