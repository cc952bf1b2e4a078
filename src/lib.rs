//! dustpan - Removes expired time-limited blocks from source text
//!
//! Blocks are fenced by start and end tags written inside the host
//! language's comments. Once a block's `to` instant has passed it is either
//! removed along with its body or unwrapped, keeping the body's inner lines.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use domain::markers::transform;
pub use error::DustpanError;
