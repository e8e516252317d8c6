//! `compile_commands.json` produced by the configure step.

use json_compilation_db::Entry;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const COMPILE_COMMANDS_FILE: &str = "compile_commands.json";

#[derive(Debug, Error)]
pub enum CompileCommandsError {
    #[error("failed to open {}, does it exist?", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load(path: &Path) -> Result<Vec<Entry>, CompileCommandsError> {
    let file = File::open(path).map_err(|source| CompileCommandsError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CompileCommandsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Absolute path of the translation unit an entry compiles.
pub fn source_file(entry: &Entry) -> PathBuf {
    if entry.file.is_absolute() {
        entry.file.clone()
    } else {
        entry.directory.join(&entry.file)
    }
}

/// Entries compiling a file inside `code_folder`; dependencies pulled into
/// the same build are skipped.
pub fn entries_under<'a>(entries: &'a [Entry], code_folder: &'a Path) -> impl Iterator<Item = &'a Entry> {
    entries
        .iter()
        .filter(move |entry| source_file(entry).starts_with(code_folder))
}
