//! In-process HTTP metrics.
//!
//! Counters and histograms are stored as atomics behind `DashMap` shards and
//! rendered by the `/metrics` handler in Prometheus text format.

pub mod metrics;
