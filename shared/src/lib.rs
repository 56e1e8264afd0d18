//! Shared types and models for the Paddy Reception Platform
//!
//! This crate contains types shared between the backend, the browser (via
//! WASM), and other components of the system. It performs no I/O.

pub mod aggregation;
pub mod calculation;
pub mod models;
pub mod receipt;
pub mod types;
pub mod validation;

pub use aggregation::*;
pub use models::*;
pub use receipt::*;
pub use types::*;
pub use validation::*;
