//! Error types for the node.

use std::time::Duration;

/// Failure of a flood-search lookup. The only error a lookup caller sees.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// No node answered within the wait interval.
    #[error("lookup for '{key}' timed out after {after:?}")]
    Timeout {
        /// The key that was looked up.
        key: String,
        /// How long the caller waited.
        after: Duration,
    },

    /// The completion handle was dropped without a value.
    #[error("lookup for '{key}' was abandoned")]
    Abandoned {
        /// The key that was looked up.
        key: String,
    },
}

/// Errors raised while parsing the command line.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("unknown argument: {0}")]
    UnknownArgument(String),

    #[error("invalid value '{value}' for {flag}")]
    InvalidValue { flag: String, value: String },

    #[error("invalid peer address '{0}', expected <port> or <host:port>")]
    InvalidPeer(String),

    #[error("invalid data entry '{0}', expected <key:value>")]
    InvalidData(String),

    #[error("host '{0}' is not routable; peers answer lookups at this address")]
    UnroutableHost(String),

    #[error("--send-attempts must be at least 1")]
    ZeroSendAttempts,

    #[error("ledger retention {retention:?} must exceed the lookup timeout {timeout:?}")]
    RetentionTooShort {
        retention: Duration,
        timeout: Duration,
    },

    /// `--help` was requested; not a failure, but parsing stops.
    #[error("help requested")]
    HelpRequested,
}
