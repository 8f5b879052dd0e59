//! CLI commands issued to the switches.

pub const CONNECTED_PORTS: &str = "show interfaces status | include connected";
pub const DISABLE_PAGING: &str = "terminal length 0";

pub fn mac_table(port: &str) -> String {
    format!("show mac address-table interface {port}")
}

pub fn arp(mac: &str) -> String {
    format!("show ip arp | include {mac}")
}

pub fn lldp_detail(port: &str) -> String {
    format!("show lldp neighbors {port} detail")
}

pub fn cdp_detail(port: &str) -> String {
    format!("show cdp neighbors {port} detail")
}

pub fn description(port: &str) -> String {
    format!("show interfaces description | include {port}")
}
