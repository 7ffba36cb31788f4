//! Bounded polling waits.
//!
//! The page is never pushed events; every wait re-runs a probe until it
//! reports `true` or the deadline passes. A probe that errors counts as
//! "not yet" (the element may simply not exist yet) and its last error is
//! carried into the timeout so drift in the page shows up in the logs.

use crate::error::{SessionError, Stage, StepError};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Poll `probe` every `interval` until it returns `Ok(true)` or `timeout`
/// elapses. The probe always runs at least once.
pub async fn wait_until<F, Fut>(
    stage: Stage,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<Duration, StepError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, SessionError>>,
{
    let start = Instant::now();
    let deadline = start + timeout;
    let mut last_error: Option<String> = None;

    loop {
        match probe().await {
            Ok(true) => {
                let waited = start.elapsed();
                debug!("{}: ready after {}ms", stage, waited.as_millis());
                return Ok(waited);
            }
            Ok(false) => {}
            Err(e) => last_error = Some(e.to_string()),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(StepError::Timeout {
                stage,
                waited_ms: start.elapsed().as_millis() as u64,
                last_error,
            });
        }
        sleep(interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TICK: Duration = Duration::from_millis(2);

    #[tokio::test]
    async fn ready_on_first_probe() {
        let waited = wait_until(Stage::Submit, Duration::from_secs(1), TICK, || async {
            Ok(true)
        })
        .await;
        tokio_test::assert_ok!(waited);
    }

    #[tokio::test]
    async fn becomes_ready_after_a_few_polls() {
        let calls = AtomicUsize::new(0);
        let result = wait_until(Stage::RegionLoaded, Duration::from_secs(2), TICK, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(n >= 3) }
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn times_out_when_never_ready() {
        let err = wait_until(
            Stage::RegionPresent,
            Duration::from_millis(20),
            TICK,
            || async { Ok(false) },
        )
        .await
        .unwrap_err();
        match err {
            StepError::Timeout {
                stage, last_error, ..
            } => {
                assert_eq!(stage, Stage::RegionPresent);
                assert!(last_error.is_none());
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn probe_errors_are_retried_and_reported() {
        let err = wait_until(Stage::Submit, Duration::from_millis(15), TICK, || async {
            Err(SessionError::NotFound("input".into()))
        })
        .await
        .unwrap_err();
        assert!(
            err.to_string().contains("no element matches 'input'"),
            "got: {err}"
        );
    }
}
