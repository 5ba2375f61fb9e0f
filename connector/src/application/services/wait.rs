//! Bounded, cancellable polling.

use std::future::Future;
use std::time::Duration;

use connector_common::ConnectorConfig;
use tokio::time::Instant;

/// How often and how long to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    #[must_use]
    pub fn from_config(config: &ConnectorConfig) -> Self {
        Self {
            attempts: config.discovery_attempts,
            interval: Duration::from_secs(config.discovery_interval_secs),
        }
    }

    /// Upper bound on the whole poll, probes included.
    #[must_use]
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.attempts)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempts: 120,
            interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Ready(T),
    TimedOut,
    Cancelled,
}

/// Run `probe` up to `policy.attempts` times, sleeping `policy.interval`
/// before each call, until it yields a value.
///
/// The whole poll ends by [`PollPolicy::budget`] after the call, however long
/// individual probes take; a probe still running at the deadline is dropped.
/// `cancel` is raced against both the sleep and the probe; once it resolves
/// no further probe is started.
pub async fn poll_until<T, F, Fut>(
    policy: &PollPolicy,
    cancel: impl Future<Output = ()>,
    mut probe: F,
) -> PollOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now()
        .checked_add(policy.budget())
        .unwrap_or_else(far_future);
    let mut cancel = std::pin::pin!(cancel);
    let mut expired = std::pin::pin!(tokio::time::sleep_until(deadline));

    for attempt in 1..=policy.attempts {
        let wake = Instant::now()
            .checked_add(policy.interval)
            .map_or(deadline, |t| t.min(deadline));
        tokio::select! {
            biased;
            () = &mut cancel => return PollOutcome::Cancelled,
            () = tokio::time::sleep_until(wake) => {}
        }

        // A probe that completes at the deadline still counts.
        let found = tokio::select! {
            biased;
            () = &mut cancel => return PollOutcome::Cancelled,
            found = probe(attempt) => found,
            () = &mut expired => return PollOutcome::TimedOut,
        };
        if let Some(value) = found {
            return PollOutcome::Ready(value);
        }
        if Instant::now() >= deadline {
            break;
        }
    }

    PollOutcome::TimedOut
}

fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400 * 365 * 30)
}
