//! # SSH Sessions
//!
//! Drives a switch CLI over an interactive SSH shell, the way an operator
//! would: one PTY per session, commands typed line by line, output read until
//! the prompt comes back.
//!
//! Host keys are not verified. The tool only reads state from switches the
//! operator already manages.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use portinspector_common::config::Credentials;
use portinspector_common::error::SessionError;
use portinspector_common::session::{CommandSession, SessionConnector};
use regex::Regex;
use russh::client::{self, Handle, Msg};
use russh::{Channel, ChannelMsg, Disconnect};
use russh_keys::key::PublicKey;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::commands;

static PROMPT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.\-()/:@]+[#>]$").unwrap());
static PAGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*--More--\s*$").unwrap());

const TERMINAL: &str = "vt100";
const TERMINAL_WIDTH: u32 = 511;
const TERMINAL_HEIGHT: u32 = 24;

/// What ends a read from the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Any line that looks like a CLI prompt.
    AnyPrompt,
    /// The prompt last seen on this session.
    KnownPrompt,
    /// A `Password:` challenge or any prompt.
    PasswordOrPrompt,
}

struct AcceptAnyHostKey;

#[async_trait]
impl client::Handler for AcceptAnyHostKey {
    type Error = russh::Error;

    async fn check_server_key(self, _server_public_key: &PublicKey) -> Result<(Self, bool), Self::Error> {
        Ok((self, true))
    }
}

/// Device types whose CLI behaves like Cisco IOS: `#`/`>` prompts,
/// `terminal length 0` and `enable`.
const SUPPORTED_DEVICE_TYPES: &[&str] = &["cisco_ios", "cisco_xe", "cisco_ios_ssh"];

fn check_device_type(host: &str, device_type: &str) -> Result<(), SessionError> {
    if SUPPORTED_DEVICE_TYPES.contains(&device_type) {
        Ok(())
    } else {
        Err(SessionError::Connection {
            host: host.to_string(),
            reason: format!("unsupported device type {device_type:?}"),
        })
    }
}

/// Prompt and liveness of one shell.
#[derive(Debug)]
struct ShellState {
    host: String,
    prompt: String,
    /// Closed by us or by the switch.
    closed: bool,
    /// A command timed out; its late output may still be on the channel.
    stale: bool,
}

impl ShellState {
    fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            prompt: String::new(),
            closed: false,
            stale: false,
        }
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed || self.stale {
            Err(SessionError::Closed { host: self.host.clone() })
        } else {
            Ok(())
        }
    }

    /// Marks the shell unusable when `err` leaves unread output on the
    /// channel or the channel is gone. A late reply would otherwise be read
    /// as the answer to the next command.
    fn fail(&mut self, err: SessionError) -> SessionError {
        match err {
            SessionError::Timeout { .. } => self.stale = true,
            SessionError::Closed { .. } => self.closed = true,
            _ => {}
        }
        err
    }

    fn remember_prompt(&mut self, output: &str) {
        if let Some(prompt) = trailing_prompt(output) {
            self.prompt = prompt.to_string();
        }
    }
}

/// Opens [`SshSession`]s with password authentication.
pub struct SshConnector {
    timeout: Duration,
}

impl SshConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl SessionConnector for SshConnector {
    async fn open(
        &self,
        host: &str,
        credentials: &Credentials,
    ) -> Result<Box<dyn CommandSession>, SessionError> {
        check_device_type(host, &credentials.device_type)?;
        let session = SshSession::connect(host, credentials, self.timeout).await?;
        Ok(Box::new(session))
    }
}

pub struct SshSession {
    state: ShellState,
    handle: Handle<AcceptAnyHostKey>,
    channel: Channel<Msg>,
    secret: String,
    timeout: Duration,
}

impl SshSession {
    pub async fn connect(
        host: &str,
        credentials: &Credentials,
        read_timeout: Duration,
    ) -> Result<Self, SessionError> {
        let connection_error = |err: russh::Error| SessionError::Connection {
            host: host.to_string(),
            reason: err.to_string(),
        };

        let config = Arc::new(client::Config::default());
        let connecting = client::connect(config, (host, credentials.port), AcceptAnyHostKey);
        let mut handle = timeout(read_timeout, connecting)
            .await
            .map_err(|_| SessionError::Timeout {
                host: host.to_string(),
                secs: read_timeout.as_secs(),
            })?
            .map_err(connection_error)?;

        let authenticated = handle
            .authenticate_password(credentials.username.as_str(), credentials.password.as_str())
            .await
            .map_err(connection_error)?;
        if !authenticated {
            return Err(SessionError::Authentication {
                host: host.to_string(),
                username: credentials.username.clone(),
            });
        }

        let mut channel = handle
            .channel_open_session()
            .await
            .map_err(connection_error)?;
        channel
            .request_pty(false, TERMINAL, TERMINAL_WIDTH, TERMINAL_HEIGHT, 0, 0, &[])
            .await
            .map_err(connection_error)?;
        channel.request_shell(false).await.map_err(connection_error)?;

        let mut session = Self {
            state: ShellState::new(host),
            handle,
            channel,
            secret: credentials.secret.clone(),
            timeout: read_timeout,
        };

        let banner = session.read_until(Expect::AnyPrompt).await?;
        session.state.remember_prompt(&banner);
        debug!(host, prompt = %session.state.prompt, "SSH shell ready");

        session.send_command(commands::DISABLE_PAGING).await?;
        Ok(session)
    }

    async fn write_line(&mut self, line: &str) -> Result<(), SessionError> {
        self.write(&format!("{line}\n"), line).await
    }

    /// Sends `payload`; `label` names it in errors so secrets never leak.
    async fn write(&mut self, payload: &str, label: &str) -> Result<(), SessionError> {
        self.channel
            .data(payload.as_bytes())
            .await
            .map_err(|err| SessionError::Command {
                command: label.to_string(),
                reason: err.to_string(),
            })
    }

    async fn read_until(&mut self, expect: Expect) -> Result<String, SessionError> {
        self.state.ensure_open()?;

        let limit = self.timeout;
        let mut buffer = String::new();
        loop {
            let message = match timeout(limit, self.channel.wait()).await {
                Ok(message) => message,
                Err(_) => {
                    return Err(self.state.fail(SessionError::Timeout {
                        host: self.state.host.clone(),
                        secs: limit.as_secs(),
                    }));
                }
            };

            match message {
                Some(ChannelMsg::Data { data }) | Some(ChannelMsg::ExtendedData { data, .. }) => {
                    buffer.push_str(&String::from_utf8_lossy(&data));
                }
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(self.state.fail(SessionError::Closed {
                        host: self.state.host.clone(),
                    }));
                }
                Some(_) => {
                    trace!(host = %self.state.host, "ignored channel message");
                    continue;
                }
            }

            if PAGER.is_match(&buffer) {
                buffer = PAGER.replace(&buffer, "\n").into_owned();
                self.write(" ", "--More--").await?;
                continue;
            }

            if self.is_complete(&buffer, expect) {
                return Ok(normalize(&buffer));
            }
        }
    }

    fn is_complete(&self, buffer: &str, expect: Expect) -> bool {
        match expect {
            Expect::AnyPrompt => trailing_prompt(buffer).is_some(),
            Expect::KnownPrompt if self.state.prompt.is_empty() => trailing_prompt(buffer).is_some(),
            Expect::KnownPrompt => last_line(buffer) == self.state.prompt,
            Expect::PasswordOrPrompt => {
                last_line(buffer).ends_with("assword:") || trailing_prompt(buffer).is_some()
            }
        }
    }
}

#[async_trait]
impl CommandSession for SshSession {
    fn host(&self) -> &str {
        &self.state.host
    }

    async fn send_command(&mut self, command: &str) -> Result<String, SessionError> {
        self.state.ensure_open()?;
        self.write_line(command).await?;
        let raw = self.read_until(Expect::KnownPrompt).await?;
        Ok(strip_echo_and_prompt(&raw, command))
    }

    async fn enable(&mut self) -> Result<(), SessionError> {
        if self.state.prompt.ends_with('#') {
            return Ok(());
        }

        self.write_line("enable").await?;
        let mut output = self.read_until(Expect::PasswordOrPrompt).await?;
        if output.trim_end().ends_with("assword:") {
            let secret = format!("{}\n", self.secret);
            self.write(&secret, "enable secret").await?;
            output = self.read_until(Expect::AnyPrompt).await?;
        }
        self.state.remember_prompt(&output);

        if self.state.prompt.ends_with('#') {
            Ok(())
        } else {
            Err(SessionError::Command {
                command: "enable".to_string(),
                reason: "privileged mode was refused".to_string(),
            })
        }
    }

    async fn find_prompt(&mut self) -> Result<String, SessionError> {
        self.write_line("").await?;
        let output = self.read_until(Expect::AnyPrompt).await?;
        self.state.remember_prompt(&output);
        Ok(self.state.prompt.clone())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if self.state.closed {
            return Ok(());
        }
        self.state.closed = true;
        if let Err(err) = self.channel.eof().await {
            debug!(host = %self.state.host, "sending EOF failed: {err}");
        }
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(|err| SessionError::Connection {
                host: self.state.host.clone(),
                reason: err.to_string(),
            })
    }
}

fn last_line(buffer: &str) -> &str {
    buffer
        .trim_end()
        .rsplit(['\n', '\r'])
        .next()
        .unwrap_or_default()
        .trim()
}

/// The prompt at the end of `buffer`, if the shell is waiting for input.
fn trailing_prompt(buffer: &str) -> Option<&str> {
    let line = last_line(buffer);
    PROMPT_LINE.is_match(line).then_some(line)
}

fn normalize(buffer: &str) -> String {
    buffer
        .replace("\r\n", "\n")
        .replace(['\r', '\u{8}'], "")
}

/// Drops the echoed command line and the trailing prompt line.
fn strip_echo_and_prompt(output: &str, command: &str) -> String {
    let mut lines: Vec<&str> = output.lines().collect();

    if lines
        .last()
        .is_some_and(|line| trailing_prompt(line).is_some())
    {
        lines.pop();
    }
    if !command.is_empty() && lines.first().is_some_and(|line| line.contains(command)) {
        lines.remove(0);
    }

    lines.join("\n")
}
