//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL credential repository using Diesel
//! - **blob**: capability-confined filesystem blob store
//! - **memory**: in-process adapters for development and tests
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod blob;
pub mod memory;
pub mod persistence;
