//! Pack3r output handling.
//!
//! Turns the raw byte stream of a running Pack3r process into display lines,
//! and the output of `Pack3r --version` into a version string.

mod parser;

pub use parser::{parse_version, OutputParser};
