//! Tests for the retry executor and its Tower layer.
//!
//! - backoff.rs: linear delays and cumulative waiting
//! - behavior.rs: attempt counting, predicates, independent calls
//! - events.rs: listener callbacks

mod backoff;
mod behavior;
mod events;
