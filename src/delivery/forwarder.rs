//! Batch intake: acknowledge, then hand each record to a sender.

use crate::payload::PayloadBuilder;
use crate::record::{Batch, EventTime, Record};
use crate::time::Clock;
use crate::transport::HttpClient;

use super::DeliveryController;

/// Trait for handing a single record to its destination.
///
/// Implementations must not fail: anything that goes wrong is theirs to log.
/// This keeps the record loop running regardless of individual deliveries.
pub trait RecordSender: Send + Sync {
    /// Sends one record.
    fn send(
        &self,
        tag: &str,
        time: EventTime,
        record: &Record,
    ) -> impl std::future::Future<Output = ()> + Send;
}

impl<H: HttpClient, C: Clock> RecordSender for DeliveryController<H, C> {
    async fn send(&self, tag: &str, time: EventTime, record: &Record) {
        self.deliver(tag, time, record).await;
    }
}

/// Sender that logs the payload it would have sent.
///
/// Used for `--dry-run`. Neither the rate limiter nor the network is touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSender {
    builder: PayloadBuilder,
}

impl DryRunSender {
    /// Creates a dry-run sender formatting with `builder`.
    #[must_use]
    pub const fn new(builder: PayloadBuilder) -> Self {
        Self { builder }
    }

    /// Renders the body that would be sent.
    #[must_use]
    pub fn render(&self, record: &Record) -> String {
        match self.builder.build(record).to_json() {
            Ok(body) => String::from_utf8_lossy(&body).into_owned(),
            Err(e) => format!("<unencodable: {e}>"),
        }
    }
}

impl RecordSender for DryRunSender {
    async fn send(&self, tag: &str, time: EventTime, record: &Record) {
        tracing::info!(tag, %time, "Dry-run: {}", self.render(record));
    }
}

/// Drives a sender over incoming batches.
///
/// Records are delivered one at a time, in arrival order.
#[derive(Debug)]
pub struct Forwarder<S> {
    sender: S,
}

impl<S: RecordSender> Forwarder<S> {
    /// Creates a forwarder around `sender`.
    #[must_use]
    pub const fn new(sender: S) -> Self {
        Self { sender }
    }

    /// Returns the wrapped sender.
    #[must_use]
    pub const fn sender(&self) -> &S {
        &self.sender
    }

    /// Processes one batch.
    ///
    /// `ack` runs before the first record is sent, signalling that the
    /// batch was accepted for processing.
    pub async fn emit<A: FnOnce()>(&self, batch: &Batch, ack: A) {
        ack();

        for entry in &batch.entries {
            self.sender.send(&batch.tag, entry.time, &entry.record).await;
        }
    }
}
