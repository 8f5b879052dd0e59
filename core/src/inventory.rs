//! # Port Inventory
//!
//! Entry point of a run against one access switch: lists the connected ports,
//! drops the excluded ones and hands each remaining port to the
//! [`DeviceResolver`].

use std::sync::Arc;

use portinspector_common::config::{Credentials, SwitchConfig};
use portinspector_common::error::SessionError;
use portinspector_common::network::device::DeviceRecord;
use portinspector_common::session::{CommandSession, SessionConnector};
use portinspector_common::utils::retry::RetryPolicy;
use portinspector_protocols::{interface_status, prompt};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::commands;
use crate::resolver::DeviceResolver;

/// Reported before each port is resolved.
#[derive(Debug, Clone, Copy)]
pub struct PortProgress<'a> {
    /// Zero based position of the port.
    pub index: usize,
    pub total: usize,
    pub port: &'a str,
}

type ProgressCallback = Box<dyn Fn(PortProgress<'_>) + Send + Sync>;

pub struct PortInventory {
    connector: Arc<dyn SessionConnector>,
    switch: SwitchConfig,
    resolver: DeviceResolver,
    on_port: Option<ProgressCallback>,
}

impl PortInventory {
    pub fn new(connector: Arc<dyn SessionConnector>, switch: SwitchConfig) -> Self {
        let resolver = DeviceResolver::new(connector.clone(), RetryPolicy::default());
        Self {
            connector,
            switch,
            resolver,
            on_port: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.resolver = DeviceResolver::new(self.connector.clone(), retry);
        self
    }

    pub fn on_port(mut self, callback: impl Fn(PortProgress<'_>) + Send + Sync + 'static) -> Self {
        self.on_port = Some(Box::new(callback));
        self
    }

    pub fn switch(&self) -> &SwitchConfig {
        &self.switch
    }

    /// Resolves every connected, non-excluded port of the access switch.
    ///
    /// Records come in port order, then MAC table order. Only failing to open
    /// the access switch session is an error.
    pub async fn collect(&self, credentials: &Credentials) -> Result<Vec<DeviceRecord>, SessionError> {
        let host = &self.switch.access_switch;
        let mut session = self.connector.open(host, credentials).await?;
        info!("Connected to access switch {}", session.host());

        let records = self.collect_from(session.as_mut(), credentials).await;

        if let Err(err) = session.close().await {
            warn!("closing session to {} failed: {err}", session.host());
        }
        Ok(records)
    }

    async fn collect_from(
        &self,
        session: &mut dyn CommandSession,
        credentials: &Credentials,
    ) -> Vec<DeviceRecord> {
        let ports = self.connected_ports(session).await;
        let core_switch = self.switch.core_host();
        if core_switch.is_none() {
            info!("No core switch configured, IP addresses come from LLDP/CDP only");
        }

        let mut records = Vec::new();
        for (index, port) in ports.iter().enumerate() {
            if let Some(callback) = &self.on_port {
                callback(PortProgress {
                    index,
                    total: ports.len(),
                    port,
                });
            }

            let span = info_span!("port", port = %port);
            let devices = self
                .resolver
                .resolve(session, port, core_switch, credentials)
                .instrument(span)
                .await;
            debug!(port = %port, devices = devices.len(), "port resolved");
            records.extend(devices);
        }
        records
    }

    async fn connected_ports(&self, session: &mut dyn CommandSession) -> Vec<String> {
        let output = match session.send_command(commands::CONNECTED_PORTS).await {
            Ok(output) => output,
            Err(err) => {
                warn!("listing connected ports failed: {err}");
                return Vec::new();
            }
        };

        let (excluded, ports): (Vec<String>, Vec<String>) = interface_status::connected_ports(&output)
            .into_iter()
            .partition(|port| self.switch.is_excluded(port));

        if !excluded.is_empty() {
            info!("Skipping excluded ports: {}", excluded.join(", "));
        }
        info!("{} connected ports to inspect", ports.len());
        ports
    }

    /// Hostname of the access switch, read from its prompt. Falls back to the
    /// configured address when the prompt carries no name.
    pub async fn fetch_hostname(&self, credentials: &Credentials) -> Result<String, SessionError> {
        let host = &self.switch.access_switch;
        let mut session = self.connector.open(host, credentials).await?;
        let found = session.find_prompt().await;

        if let Err(err) = session.close().await {
            warn!("closing session to {host} failed: {err}");
        }

        let hostname = prompt::hostname(&found?).unwrap_or_else(|| host.clone());
        debug!(hostname = %hostname, "resolved switch hostname");
        Ok(hostname)
    }
}
