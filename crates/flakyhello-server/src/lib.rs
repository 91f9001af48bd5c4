//! flakyhello server library entry.
//!
//! Wires config, the metrics registry, the greeting handler and the scrape
//! endpoint into an axum `Router`. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod greeting;
pub mod obs;
pub mod ops;
pub mod router;
