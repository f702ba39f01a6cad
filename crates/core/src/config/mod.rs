//! Configuration loading and schema definitions
//!
//! Settings for the server, storage locations, renderer limits, keystore
//! generation and logging, read from TOML.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
