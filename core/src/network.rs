//! Concrete transports behind the session traits.

pub mod ssh;
