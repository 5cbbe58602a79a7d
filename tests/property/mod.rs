//! Property-based tests.
//!
//! Run with: cargo test --test property_tests

pub mod backoff;
pub mod responder;
pub mod retry;
pub mod store;
