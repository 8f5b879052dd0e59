pub mod inspect;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use portinspector_common::config::Config;
use portinspector_common::utils::retry::{Backoff, DEFAULT_MAX_ATTEMPTS, RetryPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackoffKind {
    /// Same pause before every read
    Fixed,
    /// Pause doubles after each empty read, up to `--mac-retry-max-delay-ms`
    Exponential,
}

#[derive(Parser)]
#[command(name = "portinspector")]
#[command(version)]
#[command(about = "Lists the devices behind every connected port of an access switch.")]
pub struct CommandLine {
    /// Switch configuration: access switch, core switch and excluded ports
    #[arg(long, default_value = "config/switch_config.json")]
    pub switch_config: PathBuf,

    /// Login settings (device type, username, SSH port)
    #[arg(long, default_value = "config/credentials.json")]
    pub credentials: PathBuf,

    /// Directory the CSV report is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Do not write a CSV report
    #[arg(long)]
    pub no_csv: bool,

    /// Log file, appended to on every run
    #[arg(long, default_value = "port_inspector.log")]
    pub log_file: PathBuf,

    /// Do not write a log file
    #[arg(long)]
    pub no_log_file: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less terminal output (-q no banners, -qq table only)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Reads of an empty MAC address table before a port counts as empty
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub mac_attempts: u32,

    /// Pause between MAC address table reads
    #[arg(long, default_value_t = 100)]
    pub mac_retry_delay_ms: u64,

    /// How the pause between MAC address table reads grows
    #[arg(long, value_enum, default_value_t = BackoffKind::Fixed)]
    pub mac_backoff: BackoffKind,

    /// Longest pause between reads with exponential backoff
    #[arg(long, default_value_t = 2000)]
    pub mac_retry_max_delay_ms: u64,

    /// Upper bound on the time spent re-reading one port's MAC address table
    #[arg(long)]
    pub mac_deadline_secs: Option<u64>,

    /// How long a switch may stay silent before a command is abandoned
    #[arg(long, default_value_t = 30)]
    pub command_timeout_secs: u64,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn log_file(&self) -> Option<&Path> {
        (!self.no_log_file).then_some(self.log_file.as_path())
    }

    pub fn to_config(&self) -> Config {
        let delay = Duration::from_millis(self.mac_retry_delay_ms);
        let backoff = match self.mac_backoff {
            BackoffKind::Fixed => Backoff::Fixed(delay),
            BackoffKind::Exponential => Backoff::Exponential {
                initial: delay,
                max: Duration::from_millis(self.mac_retry_max_delay_ms).max(delay),
            },
        };
        let mut mac_retry = RetryPolicy::default()
            .with_max_attempts(self.mac_attempts)
            .with_backoff(backoff);
        if let Some(secs) = self.mac_deadline_secs {
            mac_retry = mac_retry.with_deadline(Duration::from_secs(secs));
        }

        Config {
            quiet: self.quiet,
            output_dir: self.output_dir.clone(),
            no_csv: self.no_csv,
            command_timeout: Duration::from_secs(self.command_timeout_secs),
            mac_retry,
        }
    }
}
