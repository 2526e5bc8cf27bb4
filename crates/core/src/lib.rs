//! Multi-fidelity DRAM memory controller simulator.
//!
//! This crate models the path from a stream of memory requests through a
//! request scheduler, per-bank state machines with JEDEC-style timing
//! constraints, and a refresh manager, producing per-request completion
//! latencies and aggregate statistics. It provides:
//! 1. **Controllers:** Behavioral (fixed latency), transactional
//!    (queue + sampled latency), and cycle-accurate (full protocol state
//!    machines) behind one trait.
//! 2. **Scheduling:** FIFO, FR-FCFS, and FR-FCFS with read/write grouping
//!    plus address-hazard detection.
//! 3. **Refresh:** Per-target deadlines with postponement and pull-in.
//! 4. **Configuration:** Technology presets (LPDDR5/5X, HBM3, GDDR7) and a
//!    full timing/organization parameter surface, deserializable from JSON.
//! 5. **Observability:** Statistics, optional tracing, and an optional
//!    invariant checker with a bounded violation log.
//!
//! The simulator models timing only, not memory contents, and is a pure
//! in-process library: the external driver owns the clock and advances a
//! controller with `tick()` / `drain()`.

/// Common value types and errors.
pub mod common;
/// Configuration structures, enums, and technology presets.
pub mod config;
/// Controller implementations, scheduler family, and refresh manager.
pub mod ctrl;
/// Statistics collection and reporting.
pub mod stats;

/// Root configuration type; start from `ControllerConfig::default()` or
/// deserialize from JSON.
pub use crate::config::ControllerConfig;
/// The controller contract shared by every fidelity.
pub use crate::ctrl::MemoryController;
/// Factory selecting the implementation for the configured fidelity.
pub use crate::ctrl::create_controller;
/// The unit of work submitted by producers.
pub use crate::common::Request;
/// Aggregate counters with derived metrics.
pub use crate::stats::Statistics;
