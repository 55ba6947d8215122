//! # HTTP Middleware
//!
//! - `metrics`: per-request counters and latency histograms, plus the
//!   registry gauges rendered on every `/metrics` scrape.

pub mod metrics;
