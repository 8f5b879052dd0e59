//! `show cdp neighbors <port> detail`

use once_cell::sync::Lazy;
use portinspector_common::network::device::NeighborDetail;
use regex::Regex;

use crate::text;

static IP_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"IP address: (\d+\.\d+\.\d+\.\d+)").unwrap());
static DEVICE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"Device ID: ([^\r\n]+)").unwrap());
// The chassis MAC sits on the line following `Platform: ...,  Capabilities: ...`.
static CHASSIS_MAC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Platform: .+,  Capabilities: .+\n.+Address:\s+([0-9a-f:.]{12,17})").unwrap()
});

pub fn parse(output: &str) -> NeighborDetail {
    NeighborDetail {
        mac_address: text::capture(&CHASSIS_MAC, output),
        ip_address: text::capture_ipv4(&IP_ADDRESS, output),
        system_name: text::capture(&DEVICE_ID, output),
    }
}
