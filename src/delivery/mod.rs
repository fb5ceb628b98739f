//! Rate-limited delivery of records to the ingestion endpoint.
//!
//! This module provides:
//! - The shared last-attempt state and interval check ([`RateLimiter`])
//! - The explicit result of one attempt ([`DeliveryOutcome`])
//! - The controller that builds, sends and classifies requests ([`DeliveryController`])
//! - The per-record sending seam ([`RecordSender`]) and a logging-only sender ([`DryRunSender`])
//! - Batch intake with acknowledgement ([`Forwarder`])

mod controller;
mod forwarder;
mod outcome;
mod rate_limit;

#[cfg(test)]
mod forwarder_tests;

pub use controller::{API_KEY_HEADER, DeliveryController, USER_AGENT};
pub use forwarder::{DryRunSender, Forwarder, RecordSender};
pub use outcome::DeliveryOutcome;
pub use rate_limit::{RateLimited, RateLimiter};
