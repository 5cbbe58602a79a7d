//! Core infrastructure shared by the brandkit client crates.
//!
//! This crate provides:
//! - An event system used by the retry, connectivity, gateway and completion
//!   components for observability
//! - [`ClientError`], the error taxonomy every remote call resolves to

pub mod error;
pub mod events;

pub use error::{ClientError, ErrorKind};
pub use events::{BoxedEventListener, Event, EventListener, EventListeners, FnListener};
