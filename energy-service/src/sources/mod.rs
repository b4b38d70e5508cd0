pub mod seed_file;

pub use seed_file::{SeedFileSource, SeedReport, SourceError};
