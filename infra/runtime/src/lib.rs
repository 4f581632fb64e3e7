//! # Runtime
//!
//! Standardized [Tokio](https://tokio.rs) runtime profiles, so every binary
//! in the workspace starts with predictable thread counts, stack sizes, and
//! keep-alive behavior instead of ad-hoc `#[tokio::main]` defaults.
//!
//! ## Example
//!
//! ```rust,ignore
//! #[shub_runtime::main(high_performance)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use shub_derive::main;

use std::{thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Worker-thread fallback when parallelism detection fails.
const DEFAULT_WORKER_THREADS: usize = 4;
/// Default worker stack size (3 `MiB`).
const DEFAULT_STACK_SIZE: usize = 3 * 1024 * 1024;
/// Stack size clamp bounds (1 and 16 `MiB`).
const MIN_STACK_SIZE: usize = 1024 * 1024;
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
/// How long an idle worker stays alive.
const THREAD_KEEP_ALIVE: Duration = Duration::from_secs(60);

/// `TOKIO_WORKER_THREADS` wins when set and sane; otherwise the detected
/// hardware parallelism.
fn detect_worker_threads() -> usize {
    std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0 && n <= 1024)
        .unwrap_or_else(|| {
            available_parallelism().map(std::num::NonZero::get).unwrap_or(DEFAULT_WORKER_THREADS)
        })
}

/// Configuration for the Tokio runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: detect_worker_threads(),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: "thread-worker".to_owned(),
            thread_keep_alive: THREAD_KEEP_ALIVE,
        }
    }
}

impl RuntimeConfig {
    /// Preset for high-throughput server applications.
    #[must_use = "Use this configuration for high-performance server applications"]
    pub fn high_performance() -> Self {
        Self {
            worker_threads: detect_worker_threads(),
            stack_size: 4 * 1024 * 1024,
            thread_name: "thread-hp".to_owned(),
            thread_keep_alive: Duration::from_secs(300),
        }
    }

    /// Preset for client applications where memory footprint matters.
    #[must_use = "Use this configuration for low-latency client applications"]
    pub fn memory_efficient() -> Self {
        Self {
            worker_threads: (detect_worker_threads() / 2).max(1),
            stack_size: 2 * 1024 * 1024,
            thread_name: "thread-mem".to_owned(),
            thread_keep_alive: Duration::from_secs(30),
        }
    }

    #[must_use = "Customize the number of worker threads for the runtime"]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, 1024);
        self
    }

    #[must_use = "Customize the stack size for worker threads"]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use = "Customize the thread name"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.thread_name = if name.trim().is_empty() { "thread-worker".to_owned() } else { name };
        self
    }

    fn normalized(&self) -> Self {
        Self {
            worker_threads: self.worker_threads.clamp(1, 1024),
            stack_size: self.stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE),
            thread_name: if self.thread_name.trim().is_empty() {
                "thread-worker".to_owned()
            } else {
                self.thread_name.clone()
            },
            thread_keep_alive: self.thread_keep_alive,
        }
    }
}

/// Creates a new multithreaded Tokio runtime from the given configuration.
///
/// All Tokio features are enabled; worker count, stack size, thread naming,
/// and keep-alive come from the (normalized) configuration.
///
/// # Errors
/// Returns an [`anyhow::Error`] if the Tokio runtime cannot be created,
/// typically due to OS-level thread limits or resource exhaustion.
pub fn build_runtime_with_config(config: &RuntimeConfig) -> Result<Runtime> {
    let config = config.normalized();
    debug!(config = ?config, "Building tokio runtime");

    let mut builder = Builder::new_multi_thread();
    builder
        .worker_threads(config.worker_threads)
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all();

    builder.build().map_err(|e| anyhow::anyhow!("Failed to build tokio runtime: {e}"))
}

/// Creates a runtime with the default profile but a custom stack size.
///
/// The stack size is clamped to `[1 MiB, 16 MiB]`.
///
/// # Errors
/// Returns an [`anyhow::Error`] if the Tokio runtime cannot be created.
pub fn build_runtime(stack_size: usize) -> Result<Runtime> {
    build_runtime_with_config(&RuntimeConfig::default().with_stack_size(stack_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_stay_within_bounds() {
        let hp = RuntimeConfig::high_performance();
        assert!(hp.worker_threads >= 1);
        assert_eq!(hp.stack_size, 4 * 1024 * 1024);

        let mem = RuntimeConfig::memory_efficient();
        assert!(mem.worker_threads >= 1);
        assert!(mem.worker_threads <= hp.worker_threads);
    }

    #[test]
    fn stack_size_is_clamped() {
        let cfg = RuntimeConfig::default().with_stack_size(1);
        assert_eq!(cfg.stack_size, MIN_STACK_SIZE);

        let cfg = RuntimeConfig::default().with_stack_size(usize::MAX);
        assert_eq!(cfg.stack_size, MAX_STACK_SIZE);
    }

    #[test]
    fn blank_thread_names_fall_back() {
        let cfg = RuntimeConfig::default().with_thread_name("   ");
        assert_eq!(cfg.thread_name, "thread-worker");
    }

    #[test]
    fn runtime_builds_and_runs() {
        let rt = build_runtime_with_config(&RuntimeConfig::default().with_worker_threads(2))
            .expect("runtime");
        let answer = rt.block_on(async { 42 });
        assert_eq!(answer, 42);
    }
}
