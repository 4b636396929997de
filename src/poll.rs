//! Fixed-interval polling with a cancellation hook
//!
//! The only repeated wait in the migration is the probe for the new
//! custom-resource type's registration: a fixed number of attempts with a
//! fixed sleep between them, no backoff. Unlike the wait it is modeled on,
//! the loop reacts to a cancellation future between attempts, so a stuck
//! migration can be aborted without killing the process.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::{Error, Result};

/// Configuration for a bounded, fixed-interval wait
#[derive(Clone, Debug)]
pub struct PollConfig {
    /// Maximum number of probe attempts
    pub attempts: u32,
    /// Sleep between attempts (no backoff growth)
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            attempts: 10,
            interval: Duration::from_secs(5),
        }
    }
}

/// Probe until success, attempts are exhausted, or the wait is cancelled.
///
/// Any probe error counts as a failed attempt; the loop does not distinguish
/// "not yet registered" from other transient failures. Exhausting all
/// attempts yields [`Error::Timeout`]; cancellation yields a server error
/// naming the abort so the console trail shows why the run stopped.
pub async fn poll_until<C, F, Fut>(
    config: &PollConfig,
    what: &str,
    cancel: C,
    mut probe: F,
) -> Result<()>
where
    C: Future<Output = ()>,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    tokio::pin!(cancel);

    for attempt in 1..=config.attempts {
        match probe().await {
            Ok(()) => return Ok(()),
            Err(e) => {
                warn!(
                    target = %what,
                    attempt = attempt,
                    error = %e,
                    "Probe failed, waiting"
                );
                if attempt == config.attempts {
                    break;
                }
                tokio::select! {
                    _ = &mut cancel => {
                        return Err(Error::server(format!(
                            "wait for {what} aborted after {attempt} attempts"
                        )));
                    }
                    _ = tokio::time::sleep(config.interval) => {}
                }
            }
        }
    }

    Err(Error::timeout(what, config.attempts))
}
