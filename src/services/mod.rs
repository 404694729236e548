pub mod source;

pub use source::{FileSystemSource, InMemorySource, SourceProvider};
