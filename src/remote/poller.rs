//! Polling adapter: mirror a remote cycle's state at a fixed interval.
//!
//! The poller owns a shared [`RemoteState`] that display layers read. One
//! poll task exists at a time: `start()` aborts any previous task before
//! spawning, so calling it twice cannot double the fetch rate. Polling
//! stops on its own once the remote reports inactive, unless the poller is
//! in continuous mode; a new `start()` resumes it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::errors::TransportError;
use crate::remote::StatusSource;
use crate::remote::client::CycleStatus;

/// Local mirror of the remote cycle, reconciled on every poll tick.
#[derive(Debug, Clone)]
pub struct RemoteState {
    pub phase: String,
    pub logs: Vec<String>,
    pub progress: u8,
    pub active: bool,
    /// How many remote log lines have already been mirrored.
    known_remote_lines: usize,
    /// Consecutive failed fetches; the error line is logged only on the
    /// first failure of a streak.
    consecutive_errors: u32,
}

impl RemoteState {
    fn new() -> Self {
        Self {
            phase: "IDLE".to_string(),
            logs: Vec::new(),
            progress: 0,
            active: false,
            known_remote_lines: 0,
            consecutive_errors: 0,
        }
    }

    fn apply(&mut self, status: CycleStatus) {
        self.consecutive_errors = 0;
        self.phase = status.phase;
        self.progress = status.progress;
        self.active = status.active;

        if status.logs.len() < self.known_remote_lines {
            // Remote restarted with a fresh log; resync wholesale.
            self.logs = status.logs.clone();
        } else {
            for line in status.logs.iter().skip(self.known_remote_lines) {
                self.logs.push(line.clone());
            }
        }
        self.known_remote_lines = status.logs.len();
    }

    fn apply_error(&mut self, err: &TransportError) {
        if self.consecutive_errors == 0 {
            self.logs.push(format!("[ERROR] {err}"));
        }
        self.consecutive_errors += 1;
        self.phase = "IDLE".to_string();
        self.progress = 0;
        self.active = false;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Interval-driven status poller over any [`StatusSource`].
pub struct StatusPoller {
    source: Arc<dyn StatusSource>,
    state: Arc<Mutex<RemoteState>>,
    interval: Duration,
    continuous: bool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl StatusPoller {
    pub fn new(source: Arc<dyn StatusSource>, interval: Duration) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(RemoteState::new())),
            interval,
            continuous: false,
            task: Mutex::new(None),
        }
    }

    /// Keep polling across terminal phases instead of stopping when the
    /// remote goes inactive.
    pub fn continuous(mut self, yes: bool) -> Self {
        self.continuous = yes;
        self
    }

    /// Begin polling. Any previous poll task is aborted first, so repeated
    /// calls leave exactly one active interval.
    pub fn start(&self) {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let interval = self.interval;
        let continuous = self.continuous;

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let fetched = source.fetch().await;
                let stop = {
                    let mut state = lock(&state);
                    match fetched {
                        Ok(status) => state.apply(status),
                        Err(err) => state.apply_error(&err),
                    }
                    !state.active && !continuous
                };
                if stop {
                    return;
                }
            }
        });

        if let Some(old) = lock(&self.task).replace(handle) {
            old.abort();
        }
    }

    pub fn stop(&self) {
        if let Some(task) = lock(&self.task).take() {
            task.abort();
        }
    }

    /// Whether a poll task is currently live.
    pub fn is_polling(&self) -> bool {
        lock(&self.task)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn snapshot(&self) -> RemoteState {
        lock(&self.state).clone()
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted source: counts fetches, serves a fixed sequence of
    /// statuses, then repeats the last one.
    struct ScriptedSource {
        hits: AtomicUsize,
        script: Vec<Result<CycleStatus, u16>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<CycleStatus, u16>>) -> Self {
            Self {
                hits: AtomicUsize::new(0),
                script,
            }
        }

        fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn trigger(&self) -> Result<(), TransportError> {
            Ok(())
        }

        async fn fetch(&self) -> Result<CycleStatus, TransportError> {
            let n = self.hits.fetch_add(1, Ordering::SeqCst);
            let entry = self.script.get(n).or_else(|| self.script.last());
            match entry {
                Some(Ok(status)) => Ok(status.clone()),
                Some(Err(code)) => Err(TransportError::UnexpectedStatus { status: *code }),
                None => Ok(CycleStatus::idle()),
            }
        }
    }

    fn active_status(phase: &str, logs: &[&str], progress: u8) -> CycleStatus {
        CycleStatus {
            phase: phase.to_string(),
            logs: logs.iter().map(|s| s.to_string()).collect(),
            progress,
            active: true,
        }
    }

    async fn run_clock(ms: u64) {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        tokio::time::advance(Duration::from_millis(ms)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_polls_once_per_interval() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(active_status(
            "TRAINING",
            &["t"],
            45,
        ))]));
        let poller = StatusPoller::new(source.clone(), Duration::from_millis(1000));

        poller.start();
        poller.start();

        run_clock(1000).await;
        assert_eq!(source.hits(), 1, "one interval, one fetch");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconciles_phase_progress_and_logs() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(active_status("SAMPLING", &["a"], 15)),
            Ok(active_status("TRAINING", &["a", "b"], 45)),
        ]));
        let poller = StatusPoller::new(source, Duration::from_millis(1000));
        poller.start();

        run_clock(1000).await;
        let state = poller.snapshot();
        assert_eq!(state.phase, "SAMPLING");
        assert_eq!(state.logs, vec!["a"]);

        run_clock(1000).await;
        let state = poller.snapshot();
        assert_eq!(state.phase, "TRAINING");
        assert_eq!(state.progress, 45);
        // Only the new line was appended
        assert_eq!(state.logs, vec!["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_remote_goes_inactive() {
        let mut done = CycleStatus::idle();
        done.phase = "IDLE".to_string();
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(active_status("PROMOTING", &["p"], 100)),
            Ok(done),
        ]));
        let poller = StatusPoller::new(source.clone(), Duration::from_millis(1000));
        poller.start();

        run_clock(1000).await;
        assert!(poller.is_polling());

        run_clock(1000).await;
        assert!(!poller.is_polling(), "terminal status ends the poll task");

        // No further fetches even as time passes
        let hits = source.hits();
        run_clock(5000).await;
        assert_eq!(source.hits(), hits);
    }

    #[tokio::test(start_paused = true)]
    async fn test_continuous_mode_keeps_polling_past_terminal() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(CycleStatus::idle())]));
        let poller =
            StatusPoller::new(source.clone(), Duration::from_millis(1000)).continuous(true);
        poller.start();

        run_clock(1000).await;
        run_clock(1000).await;
        run_clock(1000).await;
        assert_eq!(source.hits(), 3);
        assert!(poller.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_degrades_to_offline_default() {
        let source = Arc::new(ScriptedSource::new(vec![Err(503)]));
        let poller = StatusPoller::new(source, Duration::from_millis(1000)).continuous(true);
        poller.start();

        run_clock(1000).await;
        let state = poller.snapshot();
        assert_eq!(state.phase, "IDLE");
        assert!(!state.active);
        assert_eq!(state.progress, 0);
        assert_eq!(state.logs.len(), 1);
        assert!(state.logs[0].starts_with("[ERROR]"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_streak_logs_single_line() {
        let source = Arc::new(ScriptedSource::new(vec![Err(503), Err(503), Err(503)]));
        let poller = StatusPoller::new(source.clone(), Duration::from_millis(1000)).continuous(true);
        poller.start();

        run_clock(1000).await;
        run_clock(1000).await;
        run_clock(1000).await;
        assert_eq!(source.hits(), 3);
        assert_eq!(poller.snapshot().logs.len(), 1, "one error line per streak");
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_terminal_resumes_polling() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(CycleStatus::idle())]));
        let poller = StatusPoller::new(source.clone(), Duration::from_millis(1000));
        poller.start();

        run_clock(1000).await;
        assert!(!poller.is_polling());

        poller.start();
        run_clock(1000).await;
        assert_eq!(source.hits(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_aborts_task() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(active_status(
            "TRAINING",
            &[],
            45,
        ))]));
        let poller = StatusPoller::new(source.clone(), Duration::from_millis(1000));
        poller.start();
        poller.stop();

        run_clock(10_000).await;
        assert_eq!(source.hits(), 0);
        assert!(!poller.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_restart_resyncs_log_wholesale() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(active_status("TRAINING", &["a", "b", "c"], 45)),
            Ok(active_status("SAMPLING", &["fresh"], 15)),
        ]));
        let poller = StatusPoller::new(source, Duration::from_millis(1000)).continuous(true);
        poller.start();

        run_clock(1000).await;
        assert_eq!(poller.snapshot().logs, vec!["a", "b", "c"]);

        run_clock(1000).await;
        assert_eq!(poller.snapshot().logs, vec!["fresh"]);
    }
}
