//! Keeps the last few log events per session and dumps them when a session
//! reports an error, the way a sifting appender replays recent context.
//!
//! Run with `RUST_LOG=ringtrack=debug cargo run --example recent_events` to see
//! evictions as they happen.

use std::error::Error;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ringtrack::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Event {
    at: u64,
    level: &'static str,
    message: String,
}

/// Routes events to per-session buffers and replays one on error.
struct SessionAppender {
    tracker: BufferTracker<Event>,
}

impl SessionAppender {
    fn new() -> Self {
        Self {
            tracker: TrackerBuilder::new()
                .buffer_size(4)
                .max_keys(8)
                .staleness_threshold(Duration::from_millis(500))
                .sweep_interval(Duration::from_millis(100))
                .build(),
        }
    }

    fn append(&self, session: &str, event: Event) -> Result<(), BufferError> {
        let now = event.at;
        let is_error = event.level == "ERROR";
        self.tracker.record(session, now, event)?;
        if is_error {
            self.replay(session);
        }
        let swept = self.tracker.clear_stale_buffers(now);
        if swept > 0 {
            info!(swept, now, "dropped idle sessions");
        }
        Ok(())
    }

    fn replay(&self, session: &str) {
        let Some(buffer) = self.tracker.peek(session) else {
            return;
        };
        warn!(session, "error reported, replaying recent events");
        for event in buffer.to_vec() {
            println!("  [{:>5}] {:<5} {}", event.at, event.level, event.message);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let appender = Arc::new(SessionAppender::new());

    let workers: Vec<_> = (0..3u64)
        .map(|worker| {
            let appender = Arc::clone(&appender);
            thread::spawn(move || -> Result<(), BufferError> {
                for step in 0..12u64 {
                    let session = format!("session-{}", (worker * 5 + step) % 10);
                    let at = worker * 1_000 + step * 60;
                    let level = if step == 11 { "ERROR" } else { "INFO" };
                    appender.append(
                        &session,
                        Event {
                            at,
                            level,
                            message: format!("worker {} step {}", worker, step),
                        },
                    )?;
                }
                Ok(())
            })
        })
        .collect();

    for worker in workers {
        worker.join().map_err(|_| "worker panicked")??;
    }

    info!(
        sessions = appender.tracker.number_of_keys(),
        keys = ?appender.tracker.keys(),
        "done"
    );
    Ok(())
}
