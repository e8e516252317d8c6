//! Sequential configure -> build -> test over the selected projects.

use crate::cmake::{self, ConfigureRequest};
use crate::iwyu::COMPILE_COMMANDS_FILE;
use crate::process::{Invocation, ProcessRunner, RunError};
use crate::project::{
    build_directory, targets_file, Architecture, BuildMode, Environment, ProjectDescriptor,
    Registry, RUN_SET,
};
use crate::util::fs::find_executables;
use crate::util::repo::RepoLayout;
use anyhow::{Context, Result};
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::Path;

pub const ERROR_FILE: &str = "stderr.txt";

/// Test executables are recognised by this infix when no targets are named.
pub const TEST_NAME_MARKER: &str = "-tests";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing tool invocation.
    #[default]
    Abort,
    /// Record the failure and carry on with the next project.
    Continue,
}

#[derive(Clone, Debug)]
pub struct BuildArgs {
    pub build_mode: BuildMode,
    pub environment: Option<Environment>,
    pub errors_to_file: bool,
    pub threads: usize,
    pub selected_targets: Vec<String>,
    pub selected_projects: Vec<String>,
    pub build_tests: bool,
    pub run_tests: bool,
    pub architecture: Architecture,
    pub serial: bool,
    pub verbose: bool,
    pub policy: FailurePolicy,
}

impl Default for BuildArgs {
    fn default() -> Self {
        Self {
            build_mode: BuildMode::default(),
            environment: None,
            errors_to_file: false,
            threads: default_threads().get(),
            selected_targets: Vec::new(),
            selected_projects: Vec::new(),
            build_tests: false,
            run_tests: false,
            architecture: Architecture::default(),
            serial: false,
            verbose: false,
            policy: FailurePolicy::default(),
        }
    }
}

impl BuildArgs {
    /// The projects a bootable image is assembled from.
    pub fn run_set() -> Self {
        Self {
            selected_projects: RUN_SET.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }
}

pub fn default_threads() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    Failure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Configure,
    Build,
    Test,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Configure => "configure",
            Phase::Build => "build",
            Phase::Test => "test",
        })
    }
}

#[derive(Debug)]
pub struct ProjectFailure {
    pub project: String,
    pub phase: Phase,
    pub error: RunError,
}

#[derive(Debug, Default)]
pub struct BuildReport {
    /// Projects whose build step ran.
    pub built: Vec<String>,
    /// Projects with no targets to build.
    pub skipped: Vec<String>,
    pub failures: Vec<ProjectFailure>,
}

impl BuildReport {
    pub fn outcome(&self) -> BuildOutcome {
        if self.failures.is_empty() {
            BuildOutcome::Success
        } else {
            BuildOutcome::Failure
        }
    }

    fn failed(&self, project: &str) -> bool {
        self.failures.iter().any(|f| f.project == project)
    }
}

enum StepError {
    Tool(Phase, RunError),
    Fatal(anyhow::Error),
}

impl From<anyhow::Error> for StepError {
    fn from(err: anyhow::Error) -> Self {
        Self::Fatal(err)
    }
}

fn tool(phase: Phase) -> impl FnOnce(RunError) -> StepError {
    move |err| StepError::Tool(phase, err)
}

pub struct Driver<'a> {
    registry: &'a Registry,
    layout: &'a RepoLayout,
    runner: &'a mut dyn ProcessRunner,
}

impl<'a> Driver<'a> {
    pub fn new(
        registry: &'a Registry,
        layout: &'a RepoLayout,
        runner: &'a mut dyn ProcessRunner,
    ) -> Self {
        Self {
            registry,
            layout,
            runner,
        }
    }

    /// Tool failures end up in the report according to `args.policy`; only
    /// the tooling's own I/O problems are returned as `Err`.
    pub fn build(&mut self, args: &BuildArgs) -> Result<BuildReport> {
        let registry = self.registry;
        let projects = registry.select(&args.selected_projects);
        let mut report = BuildReport::default();

        for (id, descriptor) in &projects {
            tracing::info!(project = %id, "building");
            let project = descriptor.with_environment(args.environment);
            let step = self.build_project(&project, args).map(|built| {
                if built {
                    report.built.push(project.id.clone());
                } else {
                    report.skipped.push(project.id.clone());
                }
            });
            if record(step, &project.id, args.policy, &mut report)? {
                return Ok(report);
            }

            if !(args.build_tests && args.run_tests) || report.failed(id) {
                continue;
            }
            tracing::info!(project = %id, "testing");
            let step = self.run_tests(&project, args);
            if record(step, &project.id, args.policy, &mut report)? {
                return Ok(report);
            }
        }

        Ok(report)
    }

    /// Returns whether the build tool was invoked.
    fn build_project(
        &mut self,
        project: &ProjectDescriptor,
        args: &BuildArgs,
    ) -> Result<bool, StepError> {
        let code_folder = &project.code_folder;
        let mut error_file = if args.errors_to_file {
            let path = code_folder.join(ERROR_FILE);
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {} to redirect errors to", path.display()))?;
            Some(file)
        } else {
            None
        };
        let mut sinks: Vec<&mut dyn Write> = error_file.iter_mut().map(|f| f as &mut dyn Write).collect();

        let build_dir = build_directory(project, args.build_mode, args.architecture, args.serial);
        let manifest = targets_file(code_folder);

        let configure = cmake::configure_options(
            self.layout,
            &ConfigureRequest {
                project,
                build_dir: &build_dir,
                build_mode: args.build_mode,
                build_tests: args.build_tests,
                targets_file: &manifest,
                architecture: args.architecture,
                serial: args.serial,
            },
        );
        self.runner
            .run(&configure.to_invocation(), &mut sinks)
            .map_err(tool(Phase::Configure))?;

        let step = cmake::build_options(
            &build_dir,
            &manifest,
            args.threads,
            &args.selected_targets,
            args.verbose,
        );
        let built = match step.invocation() {
            Some(inv) => {
                self.runner.run(&inv, &mut sinks).map_err(tool(Phase::Build))?;
                true
            }
            None => {
                tracing::warn!(project = %project.id, targets = ?step.targets, "no targets, skipping build");
                false
            }
        };

        copy_compile_commands(&build_dir, code_folder)?;
        Ok(built)
    }

    fn run_tests(&mut self, project: &ProjectDescriptor, args: &BuildArgs) -> Result<(), StepError> {
        let build_dir = build_directory(project, args.build_mode, args.architecture, args.serial);
        let executables = if args.selected_targets.is_empty() {
            find_executables(&build_dir, |name| name.contains(TEST_NAME_MARKER))
        } else {
            find_executables(&build_dir, |name| args.selected_targets.iter().any(|t| t == name))
        };

        if executables.is_empty() {
            tracing::warn!(project = %project.id, dir = %build_dir.display(), "no test executables found");
        }
        let mut first_failure = None;
        for exe in executables {
            let inv = Invocation::new(exe.display().to_string());
            if let Err(err) = self.runner.run(&inv, &mut []) {
                tracing::warn!(project = %project.id, test = %exe.display(), "{err}");
                first_failure.get_or_insert(err);
            }
        }
        first_failure.map_or(Ok(()), |err| Err(StepError::Tool(Phase::Test, err)))
    }
}

/// Returns whether the run has to stop here.
fn record(
    step: Result<(), StepError>,
    project: &str,
    policy: FailurePolicy,
    report: &mut BuildReport,
) -> Result<bool> {
    match step {
        Ok(()) => Ok(false),
        Err(StepError::Fatal(err)) => Err(err.context(format!("while handling project {project}"))),
        Err(StepError::Tool(phase, error)) => {
            tracing::error!(%project, %phase, program = error.program(), "{error}");
            report.failures.push(ProjectFailure {
                project: project.to_string(),
                phase,
                error,
            });
            Ok(policy == FailurePolicy::Abort)
        }
    }
}

/// Copies (never links) the compile-command manifest next to the sources.
fn copy_compile_commands(build_dir: &Path, code_folder: &Path) -> Result<()> {
    let from = build_dir.join(COMPILE_COMMANDS_FILE);
    if !from.is_file() {
        tracing::debug!(path = %from.display(), "no compile commands generated");
        return Ok(());
    }
    let to = code_folder.join(COMPILE_COMMANDS_FILE);
    fs::copy(&from, &to)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
    Ok(())
}
