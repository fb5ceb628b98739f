//! stackdriver-forwarder: metric record forwarding
//!
//! A library for turning structured metric records into StackDriver custom
//! metric requests and delivering them over HTTP with simple rate limiting.

pub mod config;
pub mod delivery;
pub mod payload;
pub mod record;
pub mod time;
pub mod transport;
