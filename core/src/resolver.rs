//! # Device Resolver
//!
//! Builds the device records of a single port. The MAC address table decides
//! how many records there are; every later stage only fills in fields:
//!
//! 1. MAC address table, re-read under a [`RetryPolicy`] until it lists MACs.
//! 2. ARP on the core switch (own session, closed on every path).
//! 3. LLDP neighbor detail.
//! 4. CDP neighbor detail, only while the system name is still unknown.
//! 5. Interface description.
//!
//! Nothing past step 1 can drop a record: failures are logged and leave the
//! affected fields unknown.

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;

use portinspector_common::config::Credentials;
use portinspector_common::error::SessionError;
use portinspector_common::network::device::{DeviceRecord, NeighborDetail};
use portinspector_common::session::{CommandSession, SessionConnector};
use portinspector_common::utils::retry::RetryPolicy;
use portinspector_protocols::mac_table::{self, PortSnapshot};
use portinspector_protocols::{arp, cdp, description, has_no_neighbors, lldp};
use tracing::{debug, warn};

use crate::commands;

/// Link-layer neighbor protocols, in the order they are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborProtocol {
    Lldp,
    Cdp,
}

impl NeighborProtocol {
    fn command(self, port: &str) -> String {
        match self {
            NeighborProtocol::Lldp => commands::lldp_detail(port),
            NeighborProtocol::Cdp => commands::cdp_detail(port),
        }
    }

    fn parse(self, output: &str) -> NeighborDetail {
        match self {
            NeighborProtocol::Lldp => lldp::parse(output),
            NeighborProtocol::Cdp => cdp::parse(output),
        }
    }
}

impl fmt::Display for NeighborProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeighborProtocol::Lldp => f.write_str("LLDP"),
            NeighborProtocol::Cdp => f.write_str("CDP"),
        }
    }
}

pub struct DeviceResolver {
    connector: Arc<dyn SessionConnector>,
    retry: RetryPolicy,
}

impl DeviceResolver {
    pub fn new(connector: Arc<dyn SessionConnector>, retry: RetryPolicy) -> Self {
        Self { connector, retry }
    }

    /// Resolves the devices behind `port`. Never returns an empty list: a
    /// port without MAC addresses yields one placeholder record.
    pub async fn resolve(
        &self,
        session: &mut dyn CommandSession,
        port: &str,
        core_switch: Option<&str>,
        credentials: &Credentials,
    ) -> Vec<DeviceRecord> {
        let snapshot = self.read_mac_table(session, port).await;
        if snapshot.is_empty() {
            return vec![DeviceRecord::placeholder(port, snapshot.vlans)];
        }

        let mut records = Vec::with_capacity(snapshot.mac_addresses.len());
        for mac in &snapshot.mac_addresses {
            let mut record = DeviceRecord::new(port, mac.as_str(), snapshot.vlans.clone());

            if let Some(core) = core_switch {
                record.ip_address = self.lookup_arp(core, port, mac, credentials).await;
            }

            self.enrich_from_neighbor(session, &mut record, NeighborProtocol::Lldp)
                .await;
            if !record.has_system_name() {
                self.enrich_from_neighbor(session, &mut record, NeighborProtocol::Cdp)
                    .await;
            }

            record.port_description = self.read_description(session, port).await;
            records.push(record);
        }
        records
    }

    async fn read_mac_table(&self, session: &mut dyn CommandSession, port: &str) -> PortSnapshot {
        let command = commands::mac_table(port);
        let mut retry = self.retry.start();

        loop {
            match session.send_command(&command).await {
                Ok(output) => {
                    debug!(port, attempt = retry.attempts() + 1, %output, "MAC address table");
                    let snapshot = mac_table::parse(&output);
                    if !snapshot.is_empty() {
                        return snapshot;
                    }
                }
                Err(err @ SessionError::Command { .. }) => {
                    warn!(port, "reading MAC address table failed: {err}");
                }
                Err(err) => {
                    warn!(port, "giving up on MAC address table: {err}");
                    return PortSnapshot::default();
                }
            }

            match retry.next_delay() {
                Some(delay) if !delay.is_zero() => tokio::time::sleep(delay).await,
                Some(_) => {}
                None => break,
            }
        }

        warn!(
            port,
            attempts = retry.attempts(),
            "no MAC addresses learned on port"
        );
        PortSnapshot::default()
    }

    async fn lookup_arp(
        &self,
        core: &str,
        port: &str,
        mac: &str,
        credentials: &Credentials,
    ) -> Option<Ipv4Addr> {
        let mut session = match self.connector.open(core, credentials).await {
            Ok(session) => session,
            Err(err) => {
                warn!(port, mac, "skipping ARP lookup on {core}: {err}");
                return None;
            }
        };

        let command = commands::arp(mac);
        let result = async {
            session.enable().await?;
            session.send_command(&command).await
        }
        .await;

        if let Err(err) = session.close().await {
            warn!(port, mac, "closing session to {} failed: {err}", session.host());
        }

        match result {
            Ok(output) => {
                debug!(port, mac, core = session.host(), %output, "ARP lookup");
                arp::parse(&output)
            }
            Err(err) => {
                warn!(port, mac, "ARP lookup on {} failed: {err}", session.host());
                None
            }
        }
    }

    async fn enrich_from_neighbor(
        &self,
        session: &mut dyn CommandSession,
        record: &mut DeviceRecord,
        protocol: NeighborProtocol,
    ) {
        let port = record.port().to_string();
        match session.send_command(&protocol.command(&port)).await {
            Ok(output) => {
                debug!(port, %protocol, %output, "neighbor detail");
                if has_no_neighbors(&output) {
                    return;
                }
                record.merge_neighbor(protocol.parse(&output));
            }
            Err(err) => warn!(port, %protocol, "neighbor lookup failed: {err}"),
        }
    }

    async fn read_description(&self, session: &mut dyn CommandSession, port: &str) -> Option<String> {
        match session.send_command(&commands::description(port)).await {
            Ok(output) => description::parse(&output),
            Err(err) => {
                warn!(port, "reading interface description failed: {err}");
                None
            }
        }
    }
}
