//! `engine` crate: the host side of the node contract.
//!
//! Keeps registries of node and credential types, supplies the injected
//! capabilities, runs one node execution at a time, and turns node failures
//! into host-level errors.

pub mod error;
pub mod models;
pub mod runner;

pub use error::EngineError;
pub use models::NodeDefinition;
pub use runner::{ExecutionResult, NodeRunner};
