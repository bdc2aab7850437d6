//! Inbound/outbound data interfaces.

pub mod csv;
