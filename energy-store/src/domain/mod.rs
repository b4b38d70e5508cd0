mod reading;

pub use reading::{canonical_timestamp, Reading};
