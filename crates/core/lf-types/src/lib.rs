//! Core types for loadflow.
//!
//! This crate provides the foundational types used throughout the system:
//! - [`OperationKind`] - The four supported operations
//! - [`OperationSchema`] - Declared, defaulted parameters of each operation
//! - [`RuntimeParameters`] - String parameters supplied by the caller
//! - [`OperationSettings`] / [`AwsSettings`] - Typed, validated configuration
//! - [`SampleOutcome`] - The record produced by every iteration
//! - [`Variables`] - Per-worker variable namespace

pub mod identity;
pub mod operation;
pub mod outcome;
pub mod params;
pub mod variables;

pub use identity::*;
pub use operation::*;
pub use outcome::*;
pub use params::*;
pub use variables::*;
