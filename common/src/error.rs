use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading configuration or credentials. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("cannot read {what} from terminal: {reason}")]
    Prompt { what: String, reason: String },
}

/// Failures raised by a [`crate::session::CommandSession`] or its connector.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("cannot connect to {host}: {reason}")]
    Connection { host: String, reason: String },

    #[error("authentication failed for {username}@{host}")]
    Authentication { host: String, username: String },

    #[error("command `{command}` failed: {reason}")]
    Command { command: String, reason: String },

    #[error("timed out waiting for {host} after {secs}s")]
    Timeout { host: String, secs: u64 },

    #[error("session to {host} is closed")]
    Closed { host: String },
}

impl SessionError {
    /// True for errors raised while establishing a session.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            SessionError::Connection { .. } | SessionError::Authentication { .. }
        )
    }
}
