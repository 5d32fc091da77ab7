#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod corpus;
pub mod document;
pub mod index;
pub mod schema;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
