//! include-what-you-use over a project's compile commands.

mod compile_commands;
mod mapping;

pub use compile_commands::{entries_under, load, source_file, CompileCommandsError, COMPILE_COMMANDS_FILE};
pub use mapping::{compose, AnalysisFlags, Mapping};

use crate::process::{Invocation, ProcessRunner, RunError};
use crate::project::{Environment, ProjectDescriptor};
use crate::util::repo::RepoLayout;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;

pub const EXECUTABLE: &str = "include-what-you-use";
pub const REPORT_FILE: &str = "iwyu.txt";

/// Runs IWYU over every file of `project`, collecting its suggestions in
/// `<code>/iwyu.txt`, then lets `fix_includes.py` apply them (or only show
/// them unless `wet_run`).
///
/// `environment` overrides the project's own environment when given.
pub fn run_on_project(
    runner: &mut dyn ProcessRunner,
    layout: &RepoLayout,
    project: &ProjectDescriptor,
    environment: Option<Environment>,
    wet_run: bool,
) -> Result<()> {
    let code_folder = &project.code_folder;
    let environment = environment.unwrap_or(project.environment);
    let flags = compose(environment, &project.excluded_mappings, &layout.iwyu_mappings());

    let report_path = code_folder.join(REPORT_FILE);
    let mut report = File::create(&report_path)
        .with_context(|| format!("Failed to create {} to redirect iwyu to", report_path.display()))?;

    let entries = load(&code_folder.join(COMPILE_COMMANDS_FILE))?;
    let mut analysed = 0usize;
    for entry in entries_under(&entries, code_folder) {
        let inv = file_invocation(&flags, &entry.arguments, &entry.directory);
        match runner.run(&inv, &mut [&mut report]) {
            Ok(()) => {}
            // IWYU reports suggestions through its exit code.
            Err(RunError::Failed { status, .. }) => {
                tracing::debug!(file = %source_file(entry).display(), %status, "iwyu reported suggestions");
            }
            Err(err) => return Err(err.into()),
        }
        analysed += 1;
    }
    drop(report);
    tracing::info!(project = %project.id, files = analysed, "analysed");

    runner.run(&fix_includes(layout, &report_path, wet_run), &mut [])?;
    Ok(())
}

/// `include-what-you-use <flags> <compiler arguments without the compiler>`
pub fn file_invocation(flags: &AnalysisFlags, arguments: &[String], directory: &Path) -> Invocation {
    Invocation::new(EXECUTABLE)
        .args(flags.to_args())
        .args(arguments.iter().skip(1).cloned())
        .current_dir(directory)
}

pub fn fix_includes(layout: &RepoLayout, report: &Path, wet_run: bool) -> Invocation {
    let mut inv = Invocation::new(layout.fix_includes_script().display().to_string());
    if !wet_run {
        inv = inv.arg("--dry_run");
    }
    inv.args(["--nocomments", "--reorder"]).stdin_from(report)
}
