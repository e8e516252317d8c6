//! Typed CMake option lists for the configure and build steps.

use super::targets::{self, TargetSet};
use crate::iwyu;
use crate::process::Invocation;
use crate::project::{Architecture, BuildMode, ProjectDescriptor};
use crate::util::repo::RepoLayout;
use std::path::{Path, PathBuf};

pub const EXECUTABLE: &str = "cmake";

/// One CMake command-line option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CmakeArg {
    Source(PathBuf),
    BuildDir(PathBuf),
    Define { key: &'static str, value: String },
    Graphviz(PathBuf),
    Build(PathBuf),
    Parallel(usize),
    Verbose,
    Targets(Vec<String>),
}

impl CmakeArg {
    fn render(&self, out: &mut Vec<String>) {
        match self {
            Self::Source(dir) => out.extend(["-S".to_string(), dir.display().to_string()]),
            Self::BuildDir(dir) => out.extend(["-B".to_string(), dir.display().to_string()]),
            Self::Define { key, value } => out.extend(["-D".to_string(), format!("{key}={value}")]),
            Self::Graphviz(file) => out.push(format!("--graphviz={}", file.display())),
            Self::Build(dir) => out.extend(["--build".to_string(), dir.display().to_string()]),
            Self::Parallel(threads) => out.extend(["--parallel".to_string(), threads.to_string()]),
            Self::Verbose => out.push("-v".to_string()),
            Self::Targets(names) => {
                out.push("--target".to_string());
                out.extend(names.iter().cloned());
            }
        }
    }
}

/// Ordered option records, rendered to argv only when invoked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CmakeOptions {
    args: Vec<CmakeArg>,
}

impl CmakeOptions {
    pub fn push(&mut self, arg: CmakeArg) -> &mut Self {
        self.args.push(arg);
        self
    }

    pub fn define(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.push(CmakeArg::Define {
            key,
            value: value.to_string(),
        })
    }

    pub fn args(&self) -> &[CmakeArg] {
        &self.args
    }

    /// Value of the last `-D key=...` option.
    pub fn define_value(&self, key: &str) -> Option<&str> {
        self.args.iter().rev().find_map(|arg| match arg {
            CmakeArg::Define { key: k, value } if *k == key => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut out = Vec::new();
        for arg in &self.args {
            arg.render(&mut out);
        }
        out
    }

    pub fn to_invocation(&self) -> Invocation {
        Invocation::new(EXECUTABLE).args(self.to_args())
    }
}

/// Inputs of the configure step for one project.
#[derive(Clone, Copy, Debug)]
pub struct ConfigureRequest<'a> {
    pub project: &'a ProjectDescriptor,
    pub build_dir: &'a Path,
    pub build_mode: BuildMode,
    pub build_tests: bool,
    pub targets_file: &'a Path,
    pub architecture: Architecture,
    pub serial: bool,
}

pub fn configure_options(layout: &RepoLayout, req: &ConfigureRequest<'_>) -> CmakeOptions {
    let project = req.project;
    let projects_root = layout.projects();
    let project_folder = project
        .folder
        .strip_prefix(&projects_root)
        .unwrap_or(&project.folder);

    let mut opts = CmakeOptions::default();
    opts.push(CmakeArg::Source(project.code_folder.clone()))
        .push(CmakeArg::BuildDir(req.build_dir.to_path_buf()))
        .define("PROJECT_FOLDER", project_folder.display())
        .define("CMAKE_C_COMPILER", &project.compiler)
        .define("CMAKE_LINKER", &project.linker)
        .define("CMAKE_BUILD_TYPE", req.build_mode)
        .define("ENVIRONMENT", project.environment)
        .define("ARCHITECTURE", req.architecture)
        .define("BUILD_OUTPUT_PATH", req.build_dir.display())
        .define("REPO_ROOT", layout.root().display())
        .define("REPO_DEPENDENCIES", layout.dependencies().display())
        .define("REPO_PROJECTS", projects_root.display())
        .define("PROJECT_TARGETS_FILE", req.targets_file.display())
        .define("FLOAT_OPERATIONS", project.float_operations)
        .define("SERIAL", req.serial)
        .define("BUILD", if req.build_tests { "UNIT_TEST" } else { "PROJECT" })
        .push(CmakeArg::Graphviz(project.code_folder.join("output.dot")));

    let flags = iwyu::compose(
        project.environment,
        &project.excluded_mappings,
        &layout.iwyu_mappings(),
    );
    opts.define(
        "CMAKE_C_INCLUDE_WHAT_YOU_USE",
        format!("{};{}", iwyu::EXECUTABLE, flags.to_cmake_list()),
    );
    opts
}

/// Assembled build step. Only invokable when some target was resolved;
/// `cmake --build` without `--target` would build everything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildStep {
    pub options: CmakeOptions,
    pub targets: TargetSet,
}

impl BuildStep {
    pub fn has_work(&self) -> bool {
        self.targets.found()
    }

    pub fn invocation(&self) -> Option<Invocation> {
        self.has_work().then(|| self.options.to_invocation())
    }
}

pub fn build_options(
    build_dir: &Path,
    targets_file: &Path,
    threads: usize,
    explicit: &[String],
    verbose: bool,
) -> BuildStep {
    let mut options = CmakeOptions::default();
    options
        .push(CmakeArg::Build(build_dir.to_path_buf()))
        .push(CmakeArg::Parallel(threads));
    if verbose {
        options.push(CmakeArg::Verbose);
    }

    let targets = targets::resolve(explicit, targets_file);
    if targets.found() {
        options.push(CmakeArg::Targets(targets.names().to_vec()));
    }

    BuildStep { options, targets }
}
