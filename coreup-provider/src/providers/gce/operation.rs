//! Zone operations and the completion poller

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{ProviderError, Result};
use crate::traits::OperationSource;
use crate::types::{Operation, OperationStatus};

use super::{GceClient, PROVIDER};

/// Interval between status queries unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Waits for an asynchronous operation to finish.
///
/// The first status query is issued immediately, then once after every
/// interval. `PENDING` and `RUNNING` keep the loop going, `DONE` ends it
/// successfully and any other status ends it with
/// [`ProviderError::OperationFailed`]. Query errors abort the wait; nothing
/// is retried here.
///
/// ```rust,no_run
/// # async fn run(client: &coreup_provider::GceClient, op: &coreup_provider::Operation) -> coreup_provider::Result<()> {
/// use std::time::Duration;
/// use coreup_provider::OperationPoller;
///
/// let done = OperationPoller::new(client)
///     .interval(Duration::from_secs(2))
///     .timeout(Duration::from_secs(300))
///     .wait(op)
///     .await?;
/// # Ok(()) }
/// ```
pub struct OperationPoller<'a, S: OperationSource + ?Sized> {
    source: &'a S,
    interval: Duration,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl<'a, S: OperationSource + ?Sized> OperationPoller<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Bounds the whole wait. Without it the poller waits indefinitely.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Token that aborts the wait with [`ProviderError::Cancelled`].
    #[must_use]
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Polls `handle` until it is done.
    pub async fn wait(&self, handle: &Operation) -> Result<Operation> {
        let provider = self.source.id();
        let polling = async {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    log::debug!("[{provider}] wait for '{}' cancelled", handle.name);
                    Err(ProviderError::Cancelled {
                        provider: provider.to_string(),
                    })
                }
                result = self.poll(handle) => result,
            }
        };

        match self.timeout {
            None => polling.await,
            Some(limit) => tokio::time::timeout(limit, polling)
                .await
                .unwrap_or_else(|_| {
                    log::warn!(
                        "[{provider}] operation '{}' still pending after {limit:?}",
                        handle.name
                    );
                    Err(ProviderError::Timeout {
                        provider: provider.to_string(),
                        detail: format!("operation '{}' not done after {limit:?}", handle.name),
                    })
                }),
        }
    }

    async fn poll(&self, handle: &Operation) -> Result<Operation> {
        let provider = self.source.id();
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let op = self.source.get_operation(handle).await?;
            log::debug!(
                "[{provider}] operation '{}' #{attempt}: {} ({}%)",
                op.name,
                op.status,
                op.progress
            );
            match op.status {
                OperationStatus::Done => return Ok(op),
                OperationStatus::Pending | OperationStatus::Running => {}
                OperationStatus::Other(_) => {
                    log::error!(
                        "[{provider}] operation '{}' reported status {}",
                        op.name,
                        op.status
                    );
                    return Err(ProviderError::OperationFailed {
                        provider: provider.to_string(),
                        operation: Box::new(op),
                    });
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}

impl GceClient {
    /// Current state of a zone operation.
    ///
    /// The zone comes from the operation itself, falling back to the client zone.
    pub async fn get_operation(&self, operation: &Operation) -> Result<Operation> {
        let zone = operation.zone_name().unwrap_or(&self.zone);
        self.get(&format!("zones/{zone}/operations/{}", operation.name), &[])
            .await
    }

    /// Polls `operation` at the client's interval until it is done.
    pub async fn wait_for_operation(&self, operation: &Operation) -> Result<Operation> {
        OperationPoller::new(self)
            .interval(self.poll_interval)
            .wait(operation)
            .await
    }
}

#[async_trait]
impl OperationSource for GceClient {
    fn id(&self) -> &'static str {
        PROVIDER
    }

    async fn get_operation(&self, operation: &Operation) -> Result<Operation> {
        GceClient::get_operation(self, operation).await
    }
}
