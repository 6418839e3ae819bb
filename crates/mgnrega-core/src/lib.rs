//! Core types and trait definitions for the MGNREGA performance service.
//!
//! No HTTP, XML or database dependencies live here; every other crate in the
//! workspace builds on these types.

// Implementations use `async fn` against the RPITIT signatures in `store`.
#![allow(async_fn_in_trait)]

pub mod district;
pub mod error;
pub mod freshness;
pub mod measurement;
pub mod store;

pub use error::{Error, Result};
