//! # PortInspector Core
//!
//! Orchestrates device discovery on an access switch.
//!
//! * **[`inventory`]**: walks the connected ports of the access switch.
//! * **[`resolver`]**: turns one port into device records (MAC table, ARP,
//!   LLDP, CDP, description).
//! * **[`network`]**: the SSH implementation of the session traits.

pub mod commands;
pub mod inventory;
pub mod network;
pub mod resolver;
