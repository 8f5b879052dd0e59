//! # Network Models
//!
//! * [`device::DeviceRecord`]: a device discovered behind a switch port.
//! * [`device::ReportRow`]: the same record flattened for table/CSV output.

pub mod device;
