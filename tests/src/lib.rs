//! End-to-end runs of the port inventory against scripted switches.

#[cfg(test)]
mod inventory;
