//! In-memory, timestamp-ordered storage for energy readings.

pub mod domain;
pub mod store;

pub use domain::{canonical_timestamp, Reading};
pub use store::{ReadingStore, SourceInfo, SourceSummary};
