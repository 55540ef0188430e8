//! Pack3r command line assembly.
//!
//! The form edits a [`CommandBuilder`]; running Pack3r turns it into a
//! [`Pack3rCommand`] after [`CommandBuilder::validate`] has passed.

mod builder;
mod options;
pub mod paths;

pub use builder::{CommandBuilder, NO_PACK_DEFAULT, NO_SCAN_DEFAULT};
pub use options::{Pack3rOption, Verbosity};

use thiserror::Error;

use crate::process::VERSION_FLAG;

/// Executable and arguments of one Pack3r invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pack3rCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Pack3rCommand {
    /// `Pack3r --version`
    pub fn version_query(pack3r_path: impl Into<String>) -> Self {
        Self {
            program: pack3r_path.into(),
            args: vec![VERSION_FLAG.to_string()],
        }
    }

    /// Command line as shown in the preview and copied to the clipboard.
    pub fn preview(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
    }
}

/// Why a command can't be run, or a path was rejected.
///
/// `Display` is the dialog title, [`ValidationError::hint`] the body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unable to find Pack3r executable!")]
    MissingPack3r,

    #[error("No map file specified!")]
    MissingMap,

    #[error("No output file specified!")]
    MissingOutput,

    #[error("File '{0}' is not executable.")]
    NotExecutable(String),

    #[error("Invalid location for a map file!")]
    InvalidMapPath(String),

    #[error("'{0}' is not a Pack3r executable.")]
    InvalidPack3rBinary(String),
}

impl ValidationError {
    pub fn hint(&self) -> &'static str {
        match self {
            Self::MissingPack3r => "Make sure path to Pack3r executable is set.",
            Self::MissingMap => "Please select a valid map file to process.",
            Self::MissingOutput => "Please specify a valid output file.",
            Self::NotExecutable(_) => "Check the file permissions.",
            Self::InvalidMapPath(_) => {
                "The selected file does not appear to be located in a valid mapping installation path. \
                 Pack3r won't be able to resolve assets correctly, please move the map file to a valid \
                 mapping installation path."
            }
            Self::InvalidPack3rBinary(_) => "Select the Pack3r executable itself.",
        }
    }
}
