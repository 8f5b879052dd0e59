//! In-memory sessions replaying canned switch output.
//!
//! Each host gets a script mapping commands to replies. A command with
//! several queued replies consumes them in order and then keeps returning the
//! last one. Unknown commands return empty output, like a CLI filter that
//! matched nothing.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::config::Credentials;
use crate::error::SessionError;
use crate::session::{CommandSession, SessionConnector};

#[derive(Debug, Clone)]
enum Reply {
    Output(String),
    Fail(String),
    TimeOut,
}

#[derive(Debug, Default)]
struct HostScript {
    prompt: String,
    replies: HashMap<String, VecDeque<Reply>>,
    refuse_connection: bool,
    sent: Vec<String>,
    opened: usize,
    closed: usize,
}

/// Shared script for every host a test talks to.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConnector {
    hosts: Arc<Mutex<HashMap<String, HostScript>>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, HostScript>> {
        self.hosts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_prompt(self, host: &str, prompt: &str) -> Self {
        self.lock().entry(host.to_string()).or_default().prompt = prompt.to_string();
        self
    }

    /// Queues `output` as the next reply to `command` on `host`.
    pub fn reply(self, host: &str, command: &str, output: &str) -> Self {
        self.push(host, command, Reply::Output(output.to_string()));
        self
    }

    /// Queues a command failure as the next reply to `command` on `host`.
    pub fn fail(self, host: &str, command: &str, reason: &str) -> Self {
        self.push(host, command, Reply::Fail(reason.to_string()));
        self
    }

    /// Makes `command` on `host` time out. Like a real shell with unread
    /// output, the session is unusable afterwards.
    pub fn time_out(self, host: &str, command: &str) -> Self {
        self.push(host, command, Reply::TimeOut);
        self
    }

    /// Makes every connection attempt to `host` fail.
    pub fn refuse(self, host: &str) -> Self {
        self.lock().entry(host.to_string()).or_default().refuse_connection = true;
        self
    }

    fn push(&self, host: &str, command: &str, reply: Reply) {
        self.lock()
            .entry(host.to_string())
            .or_default()
            .replies
            .entry(command.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Commands sent to `host`, in order.
    pub fn sent(&self, host: &str) -> Vec<String> {
        self.lock().get(host).map(|h| h.sent.clone()).unwrap_or_default()
    }

    /// How many times `command` was sent to `host`.
    pub fn count(&self, host: &str, command: &str) -> usize {
        self.sent(host).iter().filter(|sent| *sent == command).count()
    }

    pub fn opened(&self, host: &str) -> usize {
        self.lock().get(host).map(|h| h.opened).unwrap_or_default()
    }

    pub fn closed(&self, host: &str) -> usize {
        self.lock().get(host).map(|h| h.closed).unwrap_or_default()
    }
}

#[async_trait]
impl SessionConnector for ScriptedConnector {
    async fn open(
        &self,
        host: &str,
        _credentials: &Credentials,
    ) -> Result<Box<dyn CommandSession>, SessionError> {
        let mut hosts = self.lock();
        let script = hosts.entry(host.to_string()).or_default();
        if script.refuse_connection {
            return Err(SessionError::Connection {
                host: host.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        script.opened += 1;

        Ok(Box::new(ScriptedSession {
            host: host.to_string(),
            hosts: self.hosts.clone(),
            open: true,
            stale: false,
        }))
    }
}

pub struct ScriptedSession {
    host: String,
    hosts: Arc<Mutex<HashMap<String, HostScript>>>,
    open: bool,
    stale: bool,
}

impl ScriptedSession {
    fn with_script<T>(&self, f: impl FnOnce(&mut HostScript) -> T) -> T {
        let mut hosts = self.hosts.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(hosts.entry(self.host.clone()).or_default())
    }
}

#[async_trait]
impl CommandSession for ScriptedSession {
    fn host(&self) -> &str {
        &self.host
    }

    async fn send_command(&mut self, command: &str) -> Result<String, SessionError> {
        if !self.open || self.stale {
            return Err(SessionError::Closed { host: self.host.clone() });
        }

        let reply = self.with_script(|script| {
            script.sent.push(command.to_string());
            match script.replies.get_mut(command) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        });

        match reply {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::Fail(reason)) => Err(SessionError::Command {
                command: command.to_string(),
                reason,
            }),
            Some(Reply::TimeOut) => {
                self.stale = true;
                Err(SessionError::Timeout {
                    host: self.host.clone(),
                    secs: 30,
                })
            }
            None => Ok(String::new()),
        }
    }

    async fn find_prompt(&mut self) -> Result<String, SessionError> {
        Ok(self.with_script(|script| script.prompt.clone()))
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if self.open {
            self.open = false;
            self.with_script(|script| script.closed += 1);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_should_report_its_host() {
        let connector = ScriptedConnector::new();
        let session = connector
            .open("10.0.0.2", &Credentials::new("cisco_ios", "netops"))
            .await
            .unwrap();

        assert_eq!(session.host(), "10.0.0.2");
    }

    #[tokio::test]
    async fn timed_out_session_should_refuse_further_commands() {
        let connector = ScriptedConnector::new()
            .time_out("sw", "show version")
            .reply("sw", "show clock", "08:30:00");
        let mut session = connector
            .open("sw", &Credentials::new("cisco_ios", "netops"))
            .await
            .unwrap();

        let first = session.send_command("show version").await.unwrap_err();
        let second = session.send_command("show clock").await.unwrap_err();

        assert!(matches!(first, SessionError::Timeout { .. }));
        assert!(matches!(second, SessionError::Closed { .. }));
        assert_eq!(connector.sent("sw"), vec!["show version"]);

        session.close().await.unwrap();
        assert_eq!(connector.closed("sw"), 1);
    }
}
