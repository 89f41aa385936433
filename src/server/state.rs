use crate::config::AppConfig;
use crate::logging::{LogEntry, LogLevel, Logger};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,

    /// Structured logger bound to the API id
    pub logger: Arc<Logger>,

    /// Fire-and-forget tasks started by the benchmark routes
    pub background: BackgroundTasks,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, logger: Arc<Logger>) -> Self {
        Self {
            config,
            logger,
            background: BackgroundTasks::default(),
        }
    }
}

/// Counters of the tasks spawned after a response was sent
#[derive(Clone, Default)]
pub struct BackgroundTasks {
    counters: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    scheduled: AtomicU64,
    running: AtomicU64,
    completed: AtomicU64,
}

/// Point-in-time view of [`BackgroundTasks`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub scheduled: u64,
    pub running: u64,
    pub completed: u64,
}

impl BackgroundTasks {
    /// Spawn a task that sleeps for `seconds` and reports through `logger`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_sleep(&self, task_id: String, seconds: u64, logger: Arc<Logger>) {
        let counters = Arc::clone(&self.counters);
        counters.scheduled.fetch_add(1, Ordering::Relaxed);

        tokio::spawn(async move {
            counters.running.fetch_add(1, Ordering::Relaxed);
            logger.log_console(
                LogEntry::new(
                    LogLevel::Debug,
                    200,
                    format!("{task_id}: sleeping for {seconds} seconds"),
                )
                .uuid(task_id.as_str())
                .path("benchmark/backgroundtask"),
            );

            tokio::time::sleep(Duration::from_secs(seconds)).await;

            logger.log_console(
                LogEntry::new(LogLevel::Debug, 200, format!("{task_id}: finished sleeping"))
                    .uuid(task_id.as_str())
                    .path("benchmark/backgroundtask"),
            );
            counters.running.fetch_sub(1, Ordering::Relaxed);
            counters.completed.fetch_add(1, Ordering::Relaxed);
        });
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats {
            scheduled: self.counters.scheduled.load(Ordering::Relaxed),
            running: self.counters.running.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
        }
    }
}
