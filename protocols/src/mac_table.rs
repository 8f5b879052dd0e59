//! `show mac address-table interface <port>`
//!
//! ```text
//!           Mac Address Table
//! -------------------------------------------
//! Vlan    Mac Address       Type        Ports
//! ----    -----------       --------    -----
//!  912    0011.2233.4455    DYNAMIC     Gi1/0/41
//! ```

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(\d+)\s+([0-9a-fA-F:.]{12,17})\s+\S+\s+\S+").unwrap()
});

/// MAC addresses learned on one port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortSnapshot {
    /// In table order. A MAC listed twice (e.g. in two VLANs) appears twice.
    pub mac_addresses: Vec<String>,
    /// Distinct VLAN ids, sorted as strings and comma-joined.
    pub vlans: Option<String>,
}

impl PortSnapshot {
    pub fn is_empty(&self) -> bool {
        self.mac_addresses.is_empty()
    }
}

pub fn parse(output: &str) -> PortSnapshot {
    let mut vlans: BTreeSet<&str> = BTreeSet::new();
    let mut mac_addresses: Vec<String> = Vec::new();

    for caps in ENTRY.captures_iter(output) {
        if let (Some(vlan), Some(mac)) = (caps.get(1), caps.get(2)) {
            vlans.insert(vlan.as_str());
            mac_addresses.push(mac.as_str().to_string());
        }
    }

    let vlans = if vlans.is_empty() {
        None
    } else {
        Some(vlans.into_iter().collect::<Vec<_>>().join(","))
    };

    PortSnapshot {
        mac_addresses,
        vlans,
    }
}
