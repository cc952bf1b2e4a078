//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod document_io;

pub use config::Config;
pub use document_io::{DocumentSink, DocumentSource};
