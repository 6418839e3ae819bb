//! Ingestion pipeline: feed document → parsed items → district and
//! measurement upserts.
//!
//! Generic over any [`PerformanceStore`](mgnrega_core::store::PerformanceStore)
//! and any [`RecordSource`]. No retries and no background work; each call
//! runs to completion or stops at the first failure, leaving earlier items
//! committed.

pub mod error;
mod pipeline;
pub mod source;

pub use error::{Error, InitError, Result};
pub use pipeline::{IngestReport, Ingestor, InitOutcome};
pub use source::{DataGovClient, RecordSource, UpstreamConfig};
