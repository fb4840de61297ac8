//! Storage trait abstraction
//!
//! Async domain traits for record access, so callers can be tested
//! against something other than a live MySQL server.

pub mod entry;

pub use entry::TnsEntryStore;
