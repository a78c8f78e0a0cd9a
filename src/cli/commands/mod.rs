//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod ats;
pub mod init;
pub mod table;
pub mod validate;

use std::io::Write;
use std::path::Path;

/// Writes command output to a file, or to stdout when no path is given
pub(crate) fn write_output(output: Option<&Path>, content: &str) -> std::io::Result<()> {
    match output {
        Some(path) => std::fs::write(path, content),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()
        }
    }
}
