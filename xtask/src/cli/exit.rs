//! Process exit codes shared by every subcommand.

use clap::error::ErrorKind;
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Exit {
    Success = 0,
    /// A required argument is missing or a value is not recognised.
    MissingArgument = 1,
    CliParsingError = 2,
    /// A build tool reported a failure.
    TargetError = 3,
    /// Anything else went wrong, e.g. file I/O.
    InternalError = 4,
}

impl Exit {
    pub fn for_clap_error(err: &clap::Error) -> Self {
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Self::Success,
            ErrorKind::InvalidValue
            | ErrorKind::MissingRequiredArgument
            | ErrorKind::MissingSubcommand
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => Self::MissingArgument,
            _ => Self::CliParsingError,
        }
    }
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}
