//! Core types for tarxiv
//!
//! Domain types, configuration and validation shared by the storage
//! layer and the command-line tools.

mod config;
pub mod constants;
mod env_config;
mod error;
mod identifier;
mod secret;
mod tns_entry;

pub use config::*;
pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use identifier::*;
pub use secret::*;
pub use tns_entry::*;
