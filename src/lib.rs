pub mod boundary;
pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod gateway;
pub mod git;
pub mod paths;
pub mod revision;
pub mod ui;
pub mod version_file;

pub use error::{RevStampError, Result};
