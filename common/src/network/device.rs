//! # Device Model
//!
//! A [`DeviceRecord`] is created per MAC address found on a port and enriched
//! stage by stage. Unknown values are `None` until the report boundary, where
//! [`ReportRow`] renders them as [`SENTINEL`].

use std::net::Ipv4Addr;

use serde::Serialize;

/// Marker for an unknown value in tables and CSV files.
pub const SENTINEL: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    port: String,
    pub vlans: Option<String>,
    pub system_name: Option<String>,
    pub ip_address: Option<Ipv4Addr>,
    pub mac_address: Option<String>,
    pub port_description: Option<String>,
}

/// What a neighbor protocol (LLDP, CDP) reported about the attached device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborDetail {
    pub mac_address: Option<String>,
    pub ip_address: Option<Ipv4Addr>,
    pub system_name: Option<String>,
}

impl DeviceRecord {
    /// A record for a MAC address seen on `port`.
    pub fn new(port: impl Into<String>, mac_address: impl Into<String>, vlans: Option<String>) -> Self {
        Self {
            mac_address: Some(mac_address.into()),
            ..Self::placeholder(port, vlans)
        }
    }

    /// The single record emitted for a port with no MAC addresses.
    pub fn placeholder(port: impl Into<String>, vlans: Option<String>) -> Self {
        Self {
            port: port.into(),
            vlans,
            system_name: None,
            ip_address: None,
            mac_address: None,
            port_description: None,
        }
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn has_system_name(&self) -> bool {
        self.system_name.is_some()
    }

    /// Folds a neighbor detail into the record.
    ///
    /// The system name is taken as reported, even when unknown. MAC and IP are
    /// only replaced by known values.
    pub fn merge_neighbor(&mut self, neighbor: NeighborDetail) {
        self.system_name = neighbor.system_name;
        if let Some(mac) = neighbor.mac_address {
            self.mac_address = Some(mac);
        }
        if let Some(ip) = neighbor.ip_address {
            self.ip_address = Some(ip);
        }
    }
}

/// One output line of the report. Column names are the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "VLAN")]
    pub vlan: String,
    #[serde(rename = "Port")]
    pub port: String,
    #[serde(rename = "System Name")]
    pub system_name: String,
    #[serde(rename = "IP Address")]
    pub ip_address: String,
    #[serde(rename = "MAC Address")]
    pub mac_address: String,
    #[serde(rename = "Port Description")]
    pub port_description: String,
}

impl ReportRow {
    pub const HEADER: [&'static str; 6] = [
        "VLAN",
        "Port",
        "System Name",
        "IP Address",
        "MAC Address",
        "Port Description",
    ];

    pub fn cells(&self) -> [&str; 6] {
        [
            &self.vlan,
            &self.port,
            &self.system_name,
            &self.ip_address,
            &self.mac_address,
            &self.port_description,
        ]
    }
}

impl From<&DeviceRecord> for ReportRow {
    fn from(record: &DeviceRecord) -> Self {
        Self {
            vlan: or_sentinel(record.vlans.as_deref()),
            port: record.port.clone(),
            system_name: or_sentinel(record.system_name.as_deref()),
            ip_address: record
                .ip_address
                .map(|ip| ip.to_string())
                .unwrap_or_else(|| SENTINEL.to_string()),
            mac_address: or_sentinel(record.mac_address.as_deref()),
            port_description: or_sentinel(record.port_description.as_deref()),
        }
    }
}

fn or_sentinel(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => SENTINEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_should_render_as_sentinels() {
        let row = ReportRow::from(&DeviceRecord::placeholder("Gi1/0/7", None));

        assert_eq!(row.port, "Gi1/0/7");
        for cell in [&row.vlan, &row.system_name, &row.ip_address, &row.mac_address, &row.port_description] {
            assert_eq!(cell, SENTINEL);
        }
    }

    #[test]
    fn report_row_should_never_carry_empty_strings() {
        let mut record = DeviceRecord::new("Gi1/0/7", "0011.2233.4455", Some("10".into()));
        record.port_description = Some(String::new());

        let row = ReportRow::from(&record);
        assert_eq!(row.port_description, SENTINEL);
        assert_eq!(row.mac_address, "0011.2233.4455");
        assert_eq!(row.vlan, "10");
    }

    #[test]
    fn merge_neighbor_should_keep_known_mac_and_ip() {
        let mut record = DeviceRecord::new("Gi1/0/7", "0011.2233.4455", None);
        record.ip_address = Some(Ipv4Addr::new(10, 0, 0, 5));

        record.merge_neighbor(NeighborDetail {
            mac_address: None,
            ip_address: None,
            system_name: Some("phone-1".into()),
        });

        assert_eq!(record.mac_address.as_deref(), Some("0011.2233.4455"));
        assert_eq!(record.ip_address, Some(Ipv4Addr::new(10, 0, 0, 5)));
        assert_eq!(record.system_name.as_deref(), Some("phone-1"));
    }

    #[test]
    fn merge_neighbor_should_prefer_reported_values() {
        let mut record = DeviceRecord::new("Gi1/0/7", "0011.2233.4455", None);

        record.merge_neighbor(NeighborDetail {
            mac_address: Some("aa:bb:cc:dd:ee:ff".into()),
            ip_address: Some(Ipv4Addr::new(10, 1, 1, 1)),
            system_name: None,
        });

        assert_eq!(record.mac_address.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
        assert_eq!(record.ip_address, Some(Ipv4Addr::new(10, 1, 1, 1)));
        assert!(!record.has_system_name());
    }
}
