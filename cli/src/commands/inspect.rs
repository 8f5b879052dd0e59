use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use chrono::Local;
use colored::*;
use dialoguer::Password;
use portinspector_common::config::{Config, Credentials, SwitchConfig};
use portinspector_common::error::ConfigError;
use portinspector_common::network::device::{ReportRow, SENTINEL};
use portinspector_common::session::SessionConnector;
use portinspector_common::success;
use portinspector_core::inventory::PortInventory;
use portinspector_core::network::ssh::SshConnector;
use tracing::info;

use crate::commands::CommandLine;
use crate::report;
use crate::terminal::{colors, print, spinner};

pub async fn inspect(args: &CommandLine, cfg: &Config) -> anyhow::Result<()> {
    print::header("configuration", cfg.quiet);
    let switch = SwitchConfig::load(&args.switch_config)?;
    let credentials = Credentials::load(&args.credentials)?;
    info!(
        "Access switch {}, core switch {}",
        switch.access_switch,
        switch.core_host().unwrap_or("none")
    );
    let credentials = prompt_secrets(credentials, &switch.access_switch)?;

    let connector: Arc<dyn SessionConnector> = Arc::new(SshConnector::new(cfg.command_timeout));
    let quiet = cfg.quiet;
    let inventory = PortInventory::new(connector, switch)
        .with_retry(cfg.mac_retry)
        .on_port(move |progress| {
            if quiet < 2 {
                spinner::report_port_progress(progress);
            }
        });

    print::header("inspecting ports", cfg.quiet);
    let hostname = inventory
        .fetch_hostname(&credentials)
        .await
        .with_context(|| format!("reading the prompt of {}", inventory.switch().access_switch))?;
    success!("Switch hostname is {hostname}");

    let start = Instant::now();
    let collected = inventory.collect(&credentials).await;
    spinner::finish();
    let records = collected
        .with_context(|| format!("inspecting {}", inventory.switch().access_switch))?;
    let timestamp = Local::now().format(report::TIMESTAMP_FORMAT).to_string();

    let rows: Vec<ReportRow> = records.iter().map(ReportRow::from).collect();
    print::header(&hostname, cfg.quiet);
    if rows.is_empty() {
        print::no_results();
    } else {
        print::print(&report::render_table(&rows).to_string());
    }
    print_summary(&rows, start, cfg.quiet);

    if !cfg.no_csv {
        let path = report::csv_path(&cfg.output_dir, &hostname, &timestamp);
        report::write_csv(&path, &rows)?;
        success!("Report saved to {}", path.display());
    }
    Ok(())
}

fn prompt_secrets(credentials: Credentials, host: &str) -> Result<Credentials, ConfigError> {
    let password = ask(&format!("Password for {}@{host}", credentials.username), "password")?;
    let secret = ask("Enable secret", "enable secret")?;
    Ok(credentials.with_secrets(password, secret))
}

fn ask(prompt: &str, what: &str) -> Result<String, ConfigError> {
    Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|err| ConfigError::Prompt {
            what: what.to_string(),
            reason: err.to_string(),
        })
}

fn print_summary(rows: &[ReportRow], start: Instant, quiet: u8) {
    if quiet > 0 {
        return;
    }

    let mut ports: Vec<&str> = rows.iter().map(|row| row.port.as_str()).collect();
    ports.dedup();
    let devices = rows.iter().filter(|row| row.mac_address != SENTINEL).count();
    let elapsed = start.elapsed().as_secs_f32();

    let output = format!(
        "{} {} {} {} {} {}",
        devices.to_string().color(colors::ACCENT).bold(),
        "devices on".color(colors::TEXT_DEFAULT),
        ports.len().to_string().color(colors::ACCENT).bold(),
        "ports in".color(colors::TEXT_DEFAULT),
        format!("{elapsed:.2}").color(colors::PRIMARY).bold(),
        "seconds".color(colors::TEXT_DEFAULT),
    );

    print::fat_separator();
    print::centerln(&output);
}
