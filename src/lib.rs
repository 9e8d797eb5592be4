//! Symbolic regression by genetic programming.
//!
//! Expressions are evolved as pre-order node sequences (see
//! [`engines::generation::Genome`]) and scored against the last column of a
//! numeric table ([`data::DataSource`]).

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;

pub use error::{GenprogError, Result};
