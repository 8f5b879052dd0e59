//! # Switch Output Extractors
//!
//! Pure parsers turning the text a switch prints for one command into typed
//! partial records. None of them fail: a line that does not match is skipped
//! and a missing value comes back as `None`.
//!
//! | Command                                   | Parser                          |
//! |-------------------------------------------|---------------------------------|
//! | `show interfaces status \| include connected` | [`interface_status::connected_ports`] |
//! | `show mac address-table interface <port>` | [`mac_table::parse`]            |
//! | `show ip arp \| include <mac>`            | [`arp::parse`]                  |
//! | `show lldp neighbors <port> detail`       | [`lldp::parse`]                 |
//! | `show cdp neighbors <port> detail`        | [`cdp::parse`]                  |
//! | `show interfaces description \| include <port>` | [`description::parse`]    |
//! | prompt                                    | [`prompt::hostname`]            |

pub mod arp;
pub mod cdp;
pub mod description;
pub mod interface_status;
pub mod lldp;
pub mod mac_table;
pub mod prompt;

mod text;

/// Neighbor tables print this when nothing is attached.
pub const NO_NEIGHBORS: &str = "Total entries displayed: 0";

/// True when a neighbor command reported no entries.
pub fn has_no_neighbors(output: &str) -> bool {
    output.contains(NO_NEIGHBORS)
}
