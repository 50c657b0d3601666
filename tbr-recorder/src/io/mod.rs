//! Operational IO side-channels.

pub mod status_writer;

pub use status_writer::{StatusLine, StatusWriter};
