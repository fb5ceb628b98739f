//! Application execution logic.
//!
//! Reads newline-delimited events from stdin and forwards every record
//! until end of input or a shutdown signal.

use std::future::Future;
use std::time::SystemTime;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::SplitStream;

use stackdriver_forwarder::config::ValidatedConfig;
use stackdriver_forwarder::delivery::{DeliveryController, DryRunSender, Forwarder, RecordSender};
use stackdriver_forwarder::payload::PayloadBuilder;
use stackdriver_forwarder::record::parse_line;
use stackdriver_forwarder::transport::{HttpError, ReqwestClient};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to build the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    ClientCreation(#[source] HttpError),

    /// Reading the input failed.
    #[error("Failed to read input: {0}")]
    Input(#[source] std::io::Error),
}

/// Counters for one run, logged at exit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RunSummary {
    batches: usize,
    records: usize,
    malformed: usize,
}

/// Executes the forwarding loop.
///
/// In dry-run mode payloads are logged and nothing is sent.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or stdin fails.
///
/// Excluded from coverage - requires stdin and signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let input = BufReader::new(tokio::io::stdin());

    let summary = if config.dry_run {
        tracing::info!("Dry-run mode enabled - payloads will be logged but not sent");
        let sender = DryRunSender::new(PayloadBuilder::new(config.cloud_type));
        forward_lines(&Forwarder::new(sender), input, &config.tag, shutdown_signal()).await?
    } else {
        let client =
            ReqwestClient::with_timeout(config.timeout).map_err(RunError::ClientCreation)?;
        let controller = create_controller(&config, client);
        forward_lines(&Forwarder::new(controller), input, &config.tag, shutdown_signal()).await?
    };

    tracing::info!(
        "Processed {} batch(es), {} record(s), {} malformed line(s)",
        summary.batches,
        summary.records,
        summary.malformed
    );
    Ok(())
}

/// Creates the delivery controller from configuration.
fn create_controller<H>(config: &ValidatedConfig, client: H) -> DeliveryController<H> {
    if !config.rate_limit.is_zero() {
        tracing::info!(
            "Rate limiting enabled: at most one request every {}ms",
            config.rate_limit.as_millis()
        );
    }

    DeliveryController::new(client, config.url.clone())
        .with_method(config.method.clone())
        .with_api_key(config.api_key.clone())
        .with_payload_builder(PayloadBuilder::new(config.cloud_type))
        .with_rate_limit(config.rate_limit)
}

/// Forwards every line of `input` until it ends or `shutdown` completes.
///
/// Lines are split on `\n` and decoded individually, so a line that is not
/// valid UTF-8 is skipped like any other malformed line.
async fn forward_lines<S, R, F>(
    forwarder: &Forwarder<S>,
    input: R,
    default_tag: &str,
    shutdown: F,
) -> Result<RunSummary, RunError>
where
    S: RecordSender,
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    let mut lines = SplitStream::new(input.split(b'\n'));
    let mut summary = RunSummary::default();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                return Ok(summary);
            }

            line = lines.next() => {
                match line {
                    Some(Ok(line)) => {
                        handle_line(forwarder, &line, default_tag, &mut summary).await;
                    }
                    Some(Err(e)) => return Err(RunError::Input(e)),
                    None => {
                        tracing::debug!("End of input");
                        return Ok(summary);
                    }
                }
            }
        }
    }
}

/// Parses one line and forwards its batch. Malformed lines are logged and skipped.
async fn handle_line<S: RecordSender>(
    forwarder: &Forwarder<S>,
    line: &[u8],
    default_tag: &str,
    summary: &mut RunSummary,
) {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let Ok(line) = std::str::from_utf8(line) else {
        summary.malformed += 1;
        tracing::warn!("Skipping malformed input line: not valid UTF-8");
        return;
    };

    let batch = match parse_line(line, default_tag, SystemTime::now()) {
        Ok(Some(batch)) => batch,
        Ok(None) => return,
        Err(e) => {
            summary.malformed += 1;
            tracing::warn!("Skipping malformed input line: {e}");
            return;
        }
    };

    summary.batches += 1;
    summary.records += batch.len();

    forwarder
        .emit(&batch, || {
            tracing::debug!(tag = %batch.tag, records = batch.len(), "Accepted batch");
        })
        .await;
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
