//! Instrumentation around driver operations.
//!
//! A hook wraps each operation's future and must yield the same value or
//! failure. [`NoopHook`] is the identity; [`TimingHook`] records latency per
//! operation name.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::{debug, warn};

use widerow_common::{DriverConfig, DEFAULT_SLOW_OPERATION_THRESHOLD_MS};

use crate::error::DriverResult;

/// Boxed future returned by hooks.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Wraps driver operations.
pub trait InstrumentationHook: Send + Sync {
    /// Wraps the future of `operation` without changing its outcome.
    fn wrap<'a, T, F>(&'a self, operation: &'static str, future: F) -> BoxFuture<'a, DriverResult<T>>
    where
        F: Future<Output = DriverResult<T>> + Send + 'a,
        T: Send + 'a;
}

/// Hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl InstrumentationHook for NoopHook {
    #[inline]
    fn wrap<'a, T, F>(&'a self, _operation: &'static str, future: F) -> BoxFuture<'a, DriverResult<T>>
    where
        F: Future<Output = DriverResult<T>> + Send + 'a,
        T: Send + 'a,
    {
        Box::pin(future)
    }
}

impl<H: InstrumentationHook> InstrumentationHook for std::sync::Arc<H> {
    fn wrap<'a, T, F>(&'a self, operation: &'static str, future: F) -> BoxFuture<'a, DriverResult<T>>
    where
        F: Future<Output = DriverResult<T>> + Send + 'a,
        T: Send + 'a,
    {
        (**self).wrap(operation, future)
    }
}

/// Latency statistics of one operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationStats {
    /// Completed calls.
    pub calls: u64,
    /// Calls that failed.
    pub failures: u64,
    /// Calls slower than the threshold.
    pub slow: u64,
    /// Sum of latencies.
    pub total: Duration,
    /// Largest latency.
    pub max: Duration,
}

impl OperationStats {
    /// Returns the mean latency.
    pub fn mean(&self) -> Duration {
        if self.calls == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total.as_nanos() / u128::from(self.calls);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    fn record(&mut self, elapsed: Duration, ok: bool, slow: bool) {
        self.calls += 1;
        if !ok {
            self.failures += 1;
        }
        if slow {
            self.slow += 1;
        }
        self.total += elapsed;
        self.max = self.max.max(elapsed);
    }
}

/// Hook that measures each operation and logs slow ones.
#[derive(Debug)]
pub struct TimingHook {
    stats: DashMap<&'static str, OperationStats>,
    slow_threshold: Duration,
}

impl Default for TimingHook {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SLOW_OPERATION_THRESHOLD_MS))
    }
}

impl TimingHook {
    /// Creates a hook that warns about operations taking at least
    /// `slow_threshold`.
    pub fn new(slow_threshold: Duration) -> Self {
        Self {
            stats: DashMap::new(),
            slow_threshold,
        }
    }

    /// Creates a hook with the slow threshold of `config`.
    pub fn from_config(config: &DriverConfig) -> Self {
        Self::new(config.slow_operation_threshold_duration())
    }

    /// Returns the statistics of `operation`, if it ran at least once.
    pub fn stats(&self, operation: &str) -> Option<OperationStats> {
        self.stats.get(operation).map(|entry| *entry)
    }

    /// Returns the statistics of every operation, sorted by name.
    pub fn snapshot(&self) -> Vec<(&'static str, OperationStats)> {
        let mut all: Vec<_> = self
            .stats
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        all.sort_by_key(|(name, _)| *name);
        all
    }

    /// Clears all statistics.
    pub fn reset(&self) {
        self.stats.clear();
    }

    fn record(&self, operation: &'static str, elapsed: Duration, ok: bool) {
        let slow = elapsed >= self.slow_threshold;
        self.stats
            .entry(operation)
            .or_default()
            .record(elapsed, ok, slow);

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        if slow {
            warn!(operation, elapsed_ms, ok, "slow operation");
        } else {
            debug!(operation, elapsed_ms, ok, "operation completed");
        }
    }
}

impl InstrumentationHook for TimingHook {
    fn wrap<'a, T, F>(&'a self, operation: &'static str, future: F) -> BoxFuture<'a, DriverResult<T>>
    where
        F: Future<Output = DriverResult<T>> + Send + 'a,
        T: Send + 'a,
    {
        Box::pin(async move {
            let started = Instant::now();
            let result = future.await;
            self.record(operation, started.elapsed(), result.is_ok());
            result
        })
    }
}
