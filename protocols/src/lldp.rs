//! `show lldp neighbors <port> detail`
//!
//! Neighbors come in two shapes. Most devices advertise their own name and a
//! chassis MAC. Avaya phones (and `AVX*` named devices) advertise a generic or
//! empty name, carry their MAC in `Port id` and describe themselves through the
//! LLDP-MED `Manufacturer`/`Model` inventory fields.

use once_cell::sync::Lazy;
use portinspector_common::network::device::NeighborDetail;
use regex::Regex;
use tracing::trace;

use crate::text;

static PORT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Port id:[ \t]+([0-9a-f:.]{12,17})").unwrap());
static CHASSIS_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Chassis id:[ \t]+([0-9a-f:.]{12,17})").unwrap());
static IP: Lazy<Regex> = Lazy::new(|| Regex::new(r"IP:[ \t]+(\d+\.\d+\.\d+\.\d+)").unwrap());
static SYSTEM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"System Name:[ \t]*([^\r\n]+)").unwrap());
static MANUFACTURER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Manufacturer:[ \t]*([^\r\n]+)").unwrap());
static MODEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"Model:[ \t]*([^\r\n]+)").unwrap());

const AVAYA_MANUFACTURER: &str = "avaya";
const AVAYA_NAME_PREFIX: &str = "AVX";

/// Raw fields of one LLDP neighbor entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LldpFields {
    pub port_id: Option<String>,
    pub chassis_id: Option<String>,
    pub ip_address: Option<std::net::Ipv4Addr>,
    pub system_name: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
}

/// The shapes of LLDP neighbor we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborKind {
    /// MAC in `Port id`, name built from `Manufacturer` + `Model`.
    Avaya,
    /// MAC in `Chassis id`, name from `System Name`.
    Generic,
}

impl LldpFields {
    pub fn extract(output: &str) -> Self {
        Self {
            port_id: text::capture(&PORT_ID, output),
            chassis_id: text::capture(&CHASSIS_ID, output),
            ip_address: text::capture_ipv4(&IP, output),
            system_name: text::capture(&SYSTEM_NAME, output),
            manufacturer: text::capture(&MANUFACTURER, output),
            model: text::capture(&MODEL, output),
        }
    }

    /// `Manufacturer` and `Model` squashed into one token, when both exist.
    fn inventory_name(&self) -> Option<String> {
        match (&self.manufacturer, &self.model) {
            (Some(manufacturer), Some(model)) => Some(text::squash(&format!("{manufacturer}{model}"))),
            _ => None,
        }
    }
}

pub fn classify(fields: &LldpFields) -> NeighborKind {
    let avaya_manufacturer = fields
        .manufacturer
        .as_deref()
        .is_some_and(|m| m.trim().eq_ignore_ascii_case(AVAYA_MANUFACTURER));
    let avaya_name = fields
        .system_name
        .as_deref()
        .is_some_and(|name| name.starts_with(AVAYA_NAME_PREFIX));

    if avaya_manufacturer || avaya_name {
        NeighborKind::Avaya
    } else {
        NeighborKind::Generic
    }
}

/// Resolves the fields of one entry into a neighbor detail.
pub fn resolve(fields: LldpFields) -> NeighborDetail {
    let kind = classify(&fields);
    trace!(?kind, "classified LLDP neighbor");

    let inventory_name = fields.inventory_name();
    let (mac_address, system_name) = match kind {
        NeighborKind::Avaya => (
            fields.port_id,
            inventory_name.or(fields.system_name),
        ),
        NeighborKind::Generic => (
            fields.chassis_id,
            fields.system_name.or(inventory_name),
        ),
    };

    NeighborDetail {
        mac_address,
        ip_address: fields.ip_address,
        system_name,
    }
}

pub fn parse(output: &str) -> NeighborDetail {
    resolve(LldpFields::extract(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const AVAYA_PHONE: &str = "\
------------------------------------------------
Local Intf: Gi1/0/12
Chassis id: 10.20.30.41
Port id: aa:bb:cc:dd:ee:ff
Port Description: 1
System Name: not advertised

Management Addresses:
    IP: 10.20.30.41

MED Information:

    MED Codes:
          (NP) Network Policy, (LI) Location Identification
    H/W revision: 9611GD01B
    Manufacturer: Avaya
    Model: IP Phone

Total entries displayed: 1
";

    const CORE_SWITCH: &str = "\
------------------------------------------------
Local Intf: Te1/1/1
Chassis id: 0011.2233.4400
Port id: Te1/0/24
Port Description: uplink-to-access
System Name: core-switch-2

System Description:
Cisco IOS Software, Catalyst L3 Switch Software

Management Addresses:
    IP: 10.0.0.1

Total entries displayed: 1
";

    #[test]
    fn avaya_phone_should_use_port_id_and_inventory_name() {
        let detail = parse(AVAYA_PHONE);

        assert_eq!(detail.system_name.as_deref(), Some("AvayaIPPhone"));
        assert_eq!(detail.mac_address.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
        assert_eq!(detail.ip_address, Some(Ipv4Addr::new(10, 20, 30, 41)));
    }

    #[test]
    fn generic_neighbor_should_use_system_name_verbatim() {
        let detail = parse(CORE_SWITCH);

        assert_eq!(detail.system_name.as_deref(), Some("core-switch-2"));
        assert_eq!(detail.mac_address.as_deref(), Some("0011.2233.4400"));
        assert_eq!(detail.ip_address, Some(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn avx_name_should_classify_as_avaya() {
        let fields = LldpFields {
            system_name: Some("AVX0412ab".into()),
            ..Default::default()
        };
        assert_eq!(classify(&fields), NeighborKind::Avaya);
    }

    #[test]
    fn avaya_manufacturer_should_match_case_insensitively() {
        let fields = LldpFields {
            manufacturer: Some("AVAYA ".into()),
            ..Default::default()
        };
        assert_eq!(classify(&fields), NeighborKind::Avaya);
    }

    #[test]
    fn avaya_without_port_id_should_not_fall_back_to_chassis() {
        let detail = resolve(LldpFields {
            chassis_id: Some("0011.2233.4455".into()),
            system_name: Some("AVX0412ab".into()),
            ..Default::default()
        });

        assert_eq!(detail.mac_address, None);
        assert_eq!(detail.system_name.as_deref(), Some("AVX0412ab"));
    }

    #[test]
    fn generic_without_name_should_synthesize_from_inventory() {
        let detail = resolve(LldpFields {
            chassis_id: Some("0011.2233.4455".into()),
            manufacturer: Some("Polycom".into()),
            model: Some("VVX 411".into()),
            ..Default::default()
        });

        assert_eq!(detail.system_name.as_deref(), Some("PolycomVVX411"));
        assert_eq!(detail.mac_address.as_deref(), Some("0011.2233.4455"));
    }

    #[test]
    fn parse_should_leave_everything_unknown_for_noise() {
        assert_eq!(parse("% LLDP is not enabled"), NeighborDetail::default());
    }
}
