//! `show ip arp | include <mac>`
//!
//! ```text
//! Internet  10.20.30.40            12   0011.2233.4455  ARPA   Vlan912
//! ```

use std::net::Ipv4Addr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text;

static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Internet\s+(\d+\.\d+\.\d+\.\d+)\s+\d+\s+[0-9a-fA-F:.]{12,17}\s+ARPA").unwrap()
});

/// IP address bound to the first dynamic ARP entry in the output.
pub fn parse(output: &str) -> Option<Ipv4Addr> {
    text::capture_ipv4(&ENTRY, output)
}
