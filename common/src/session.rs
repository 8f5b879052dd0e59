//! # Command Sessions
//!
//! The boundary between the discovery pipeline and the network: a
//! [`SessionConnector`] logs into a switch and hands back a [`CommandSession`]
//! that runs one command at a time.

use async_trait::async_trait;

use crate::config::Credentials;
use crate::error::SessionError;

#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;

/// An authenticated CLI session on a switch.
#[async_trait]
pub trait CommandSession: Send {
    /// Host this session is connected to.
    fn host(&self) -> &str;

    /// Runs a command and returns its raw output, without echo and prompt.
    async fn send_command(&mut self, command: &str) -> Result<String, SessionError>;

    /// Enters privileged mode. A no-op when already there.
    async fn enable(&mut self) -> Result<(), SessionError> {
        Ok(())
    }

    /// Returns the current CLI prompt, e.g. `access-sw-01#`.
    async fn find_prompt(&mut self) -> Result<String, SessionError>;

    /// Ends the session. Safe to call more than once.
    async fn close(&mut self) -> Result<(), SessionError>;
}

/// Opens sessions to switches.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn open(
        &self,
        host: &str,
        credentials: &Credentials,
    ) -> Result<Box<dyn CommandSession>, SessionError>;
}
