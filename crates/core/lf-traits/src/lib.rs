//! Capability traits for loadflow.
//!
//! The sampling core talks to remote services only through these traits:
//! - [`QueueClient`] - message queue operations
//! - [`ObjectStoreClient`] - object storage operations
//! - [`ClientFactory`] - builds both from a validated identity
//! - [`OutcomeSink`] - receives every sample outcome

pub mod factory;
pub mod object_store;
pub mod queue;
pub mod sink;

pub use factory::*;
pub use object_store::*;
pub use queue::*;
pub use sink::*;
