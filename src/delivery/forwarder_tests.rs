//! Tests for `Forwarder` and `DryRunSender`.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{DryRunSender, Forwarder, RecordSender};
use crate::payload::PayloadBuilder;
use crate::record::{Batch, Entry, EventTime, Record};

/// Sender that appends to a shared event log.
#[derive(Debug, Default)]
struct RecordingSender {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordSender for RecordingSender {
    async fn send(&self, tag: &str, time: EventTime, record: &Record) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{tag}@{time}:{}", record.name()));
    }
}

fn entry(time: f64, name: &str) -> Entry {
    Entry {
        time: EventTime::from_secs(time),
        record: serde_json::from_value(json!({"name": name, "value": 1})).unwrap(),
    }
}

fn batch(entries: Vec<Entry>) -> Batch {
    Batch {
        tag: "app.metrics".to_string(),
        entries,
    }
}

mod emit {
    use super::*;

    #[tokio::test]
    async fn acknowledges_before_first_delivery() {
        let sender = RecordingSender::default();
        let events = sender.events.clone();
        let forwarder = Forwarder::new(sender);

        forwarder
            .emit(&batch(vec![entry(1.0, "a")]), || {
                events.lock().unwrap().push("ack".to_string());
            })
            .await;

        let events = forwarder.sender().events.lock().unwrap().clone();
        assert_eq!(events, vec!["ack", r#"app.metrics@1:"a""#]);
    }

    #[tokio::test]
    async fn delivers_entries_in_order() {
        let forwarder = Forwarder::new(RecordingSender::default());

        forwarder
            .emit(
                &batch(vec![entry(1.0, "a"), entry(2.5, "b"), entry(3.0, "c")]),
                || {},
            )
            .await;

        let events = forwarder.sender().events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                r#"app.metrics@1:"a""#,
                r#"app.metrics@2.5:"b""#,
                r#"app.metrics@3:"c""#,
            ]
        );
    }

    #[tokio::test]
    async fn empty_batch_is_still_acknowledged() {
        let forwarder = Forwarder::new(RecordingSender::default());
        let mut acked = false;

        forwarder.emit(&batch(vec![]), || acked = true).await;

        assert!(acked);
        assert!(forwarder.sender().events.lock().unwrap().is_empty());
    }
}

mod dry_run {
    use super::*;

    #[test]
    fn renders_payload_body() {
        let sender = DryRunSender::new(PayloadBuilder::default());
        let record: Record = serde_json::from_value(
            json!({"name": "cpu_usage", "value": 42.5, "@timestamp": 1_700_000_000}),
        )
        .unwrap();

        assert_eq!(
            sender.render(&record),
            r#"{"timestamp":1700000000,"proto_version":1,"data":{"collected_at":1700000000,"name":"cpu_usage","value":42.5}}"#
        );
    }

    #[tokio::test]
    async fn send_completes_without_a_client() {
        let forwarder = Forwarder::new(DryRunSender::default());

        forwarder.emit(&batch(vec![entry(1.0, "a")]), || {}).await;
    }
}
