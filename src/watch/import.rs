//! Import status polling
//!
//! Polls an import job at a fixed interval until it reaches COMPLETED or FAILED, the
//! attempt is superseded, or the tick budget runs out.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::errors::Result;
use crate::schemas::{Config, ImportJob};
use crate::store::ImportStatusSource;

use super::attempt::{AttemptCounter, AttemptToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    pub interval: Duration,
    pub max_ticks: u32,
}

impl From<&Config> for WatchOptions {
    fn from(config: &Config) -> Self {
        WatchOptions {
            interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            max_ticks: config.poll_max_ticks.max(1),
        }
    }
}

/// How a watch ended
#[derive(Debug, Clone, PartialEq)]
pub enum WatchOutcome {
    /// The job reached COMPLETED or FAILED
    Finished(ImportJob),
    /// A newer attempt took over; nothing further was applied
    Superseded,
    /// The tick budget ran out before a terminal status
    TimedOut { last: ImportJob, ticks: u32 },
}

/// Poll `job_id` until it settles.
///
/// `on_update` sees every status observed while the attempt is current. Store errors
/// end the watch and are returned as-is.
pub async fn poll_import_status<S, F>(
    source: &S,
    job_id: &str,
    attempts: &AttemptCounter,
    token: AttemptToken,
    options: WatchOptions,
    mut on_update: F,
) -> Result<WatchOutcome>
where
    S: ImportStatusSource + ?Sized,
    F: FnMut(&ImportJob),
{
    let mut interval = tokio::time::interval(options.interval);
    let mut ticks = 0u32;

    loop {
        interval.tick().await;
        if !attempts.is_current(token) {
            return Ok(WatchOutcome::Superseded);
        }

        let fetched = source.import_status(job_id).await?;
        let job = match attempts.accept(token, fetched) {
            Ok(job) => job,
            Err(_) => return Ok(WatchOutcome::Superseded),
        };

        ticks += 1;
        tracing::debug!(import = %job_id, status = %job.status, tick = ticks, "import status polled");
        on_update(&job);

        if job.status.is_terminal() {
            tracing::info!(import = %job_id, status = %job.status, "import finished");
            return Ok(WatchOutcome::Finished(job));
        }
        if ticks >= options.max_ticks {
            tracing::warn!(import = %job_id, ticks = ticks, "import watch gave up");
            return Ok(WatchOutcome::TimedOut { last: job, ticks });
        }
    }
}

/// Owns the attempt counter for one watched slot; starting a watch cancels the last.
#[derive(Debug, Default)]
pub struct ImportWatcher {
    attempts: Arc<AttemptCounter>,
}

impl ImportWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a polling task for `job_id`, superseding any earlier watch
    pub fn spawn<S>(
        &self,
        source: Arc<S>,
        job_id: impl Into<String>,
        options: WatchOptions,
    ) -> JoinHandle<Result<WatchOutcome>>
    where
        S: ImportStatusSource + 'static,
    {
        let attempts = Arc::clone(&self.attempts);
        let token = attempts.begin();
        let job_id = job_id.into();

        tokio::spawn(async move {
            poll_import_status(source.as_ref(), &job_id, &attempts, token, options, |_| {}).await
        })
    }

    /// Stop the running watch; its pending result is discarded
    pub fn cancel(&self) {
        self.attempts.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CfsError;
    use crate::schemas::ImportStatus;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a fixed sequence of statuses, repeating the last one
    struct ScriptedSource {
        script: Mutex<Vec<ImportStatus>>,
        calls: Mutex<u32>,
    }

    impl ScriptedSource {
        fn new(script: Vec<ImportStatus>) -> Self {
            ScriptedSource {
                script: Mutex::new(script),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ImportStatusSource for ScriptedSource {
        async fn import_status(&self, job_id: &str) -> Result<ImportJob> {
            *self.calls.lock().unwrap() += 1;
            let mut script = self.script.lock().unwrap();
            let status = if script.len() > 1 {
                script.remove(0)
            } else {
                *script.first().ok_or_else(|| CfsError::NotFound(job_id.to_string()))?
            };
            Ok(ImportJob {
                id: job_id.to_string(),
                status,
                message: None,
            })
        }
    }

    fn fast(max_ticks: u32) -> WatchOptions {
        WatchOptions {
            interval: Duration::from_millis(1),
            max_ticks,
        }
    }

    #[tokio::test]
    async fn test_stops_on_completed() {
        let source = ScriptedSource::new(vec![
            ImportStatus::Pending,
            ImportStatus::Processing,
            ImportStatus::Completed,
        ]);
        let attempts = AttemptCounter::new();
        let token = attempts.begin();
        let mut seen = Vec::new();

        let outcome = poll_import_status(&source, "imp-1", &attempts, token, fast(10), |job| {
            seen.push(job.status)
        })
        .await
        .unwrap();

        assert!(matches!(outcome, WatchOutcome::Finished(ref job) if job.status == ImportStatus::Completed));
        assert_eq!(
            seen,
            vec![ImportStatus::Pending, ImportStatus::Processing, ImportStatus::Completed]
        );
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_stops_on_failed() {
        let source = ScriptedSource::new(vec![ImportStatus::Processing, ImportStatus::Failed]);
        let attempts = AttemptCounter::new();
        let token = attempts.begin();

        let outcome = poll_import_status(&source, "imp-1", &attempts, token, fast(10), |_| {})
            .await
            .unwrap();
        assert!(matches!(outcome, WatchOutcome::Finished(ref job) if job.status == ImportStatus::Failed));
    }

    #[tokio::test]
    async fn test_times_out_after_max_ticks() {
        let source = ScriptedSource::new(vec![ImportStatus::Processing]);
        let attempts = AttemptCounter::new();
        let token = attempts.begin();

        let outcome = poll_import_status(&source, "imp-1", &attempts, token, fast(3), |_| {})
            .await
            .unwrap();
        assert!(matches!(outcome, WatchOutcome::TimedOut { ticks: 3, .. }));
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_superseded_attempt_applies_nothing() {
        let source = ScriptedSource::new(vec![ImportStatus::Processing]);
        let attempts = AttemptCounter::new();
        let stale = attempts.begin();
        attempts.begin();
        let mut seen = 0;

        let outcome = poll_import_status(&source, "imp-1", &attempts, stale, fast(5), |_| seen += 1)
            .await
            .unwrap();
        assert_eq!(outcome, WatchOutcome::Superseded);
        assert_eq!(seen, 0);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let source = ScriptedSource::new(Vec::new());
        let attempts = AttemptCounter::new();
        let token = attempts.begin();

        let err = poll_import_status(&source, "imp-1", &attempts, token, fast(5), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, CfsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_watcher_spawn_and_cancel() {
        let watcher = ImportWatcher::new();
        let slow = WatchOptions {
            interval: Duration::from_millis(20),
            max_ticks: 1000,
        };

        let first = watcher.spawn(
            Arc::new(ScriptedSource::new(vec![ImportStatus::Processing])),
            "imp-1",
            slow,
        );
        let second = watcher.spawn(
            Arc::new(ScriptedSource::new(vec![ImportStatus::Completed])),
            "imp-2",
            fast(5),
        );

        assert_eq!(first.await.unwrap().unwrap(), WatchOutcome::Superseded);
        assert!(matches!(second.await.unwrap().unwrap(), WatchOutcome::Finished(_)));

        let third = watcher.spawn(
            Arc::new(ScriptedSource::new(vec![ImportStatus::Processing])),
            "imp-3",
            slow,
        );
        watcher.cancel();
        assert_eq!(third.await.unwrap().unwrap(), WatchOutcome::Superseded);
    }
}
