//! Collaborators supplied by the caller: cancellation and telemetry.
//!
//! Both are optional. Cancellation is checked once, before any work starts.
//! Telemetry receives one timer per pipeline phase (`lex`, `parse`,
//! `propagate`, `sort`).

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A shared flag a caller can set to cancel a pending parse.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A token that is not canceled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Visible to every clone of this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Check whether cancellation was requested.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A running phase measurement.
pub trait Timer {
    /// Stop the measurement.
    fn end(self: Box<Self>);
}

/// Receives phase timings.
pub trait Collector: Send + Sync {
    /// Start timing the named phase.
    fn start(&self, name: &str) -> Box<dyn Timer>;
}

struct NoopTimer;

impl Timer for NoopTimer {
    fn end(self: Box<Self>) {}
}

/// A [`Collector`] that reports phase durations as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCollector;

struct TracingTimer {
    name: String,
    started: Instant,
}

impl Collector for TracingCollector {
    fn start(&self, name: &str) -> Box<dyn Timer> {
        Box::new(TracingTimer {
            name: name.to_string(),
            started: Instant::now(),
        })
    }
}

impl Timer for TracingTimer {
    fn end(self: Box<Self>) {
        tracing::debug!(
            "phase {} took {:?}",
            self.name,
            self.started.elapsed()
        );
    }
}

/// Per-parse collaborators.
#[derive(Clone, Default)]
pub struct ParseContext {
    cancel: Option<CancellationToken>,
    telemetry: Option<Arc<dyn Collector>>,
}

impl ParseContext {
    /// A context with no cancellation and no telemetry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Attach a telemetry collector.
    #[must_use]
    pub fn with_telemetry(mut self, collector: Arc<dyn Collector>) -> Self {
        self.telemetry = Some(collector);
        self
    }

    /// Check whether the caller asked to cancel.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_canceled)
    }

    /// Start timing a phase; a no-op without a collector.
    #[must_use]
    pub fn start(&self, name: &str) -> Box<dyn Timer> {
        match &self.telemetry {
            Some(collector) => collector.start(name),
            None => Box::new(NoopTimer),
        }
    }
}

impl fmt::Debug for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseContext")
            .field("cancel", &self.cancel)
            .field("telemetry", &self.telemetry.is_some())
            .finish()
    }
}
