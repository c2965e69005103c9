//! Aggregation: concurrent fan-out to every source, isolated per adapter.
//!
//! Each adapter call is resolved independently (cache, query, failure
//! conversion, panic capture), then the results are merged into an
//! [`crate::types::AggregatedResult`] keyed by the canonical source order.

pub mod aggregate;
