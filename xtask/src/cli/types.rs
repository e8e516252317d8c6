use crate::build::{default_threads, BuildArgs, FailurePolicy};
use crate::project::{Architecture, BuildMode, Environment};
use crate::qemu::QemuArgs;
use clap::{Args, Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "xtask")]
#[command(about = "FLOS developer tasks: build projects, run include-what-you-use, boot QEMU")]
pub struct Cli {
    /// Repository root (defaults to the directory containing xtask/)
    #[arg(long, global = true, env = "FLOS_REPO_ROOT")]
    pub repo_root: Option<PathBuf>,

    /// Debug logging, verbose build tool output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Cmd,
}

impl Cli {
    /// Drops empty project ids, so `-p ""` selects every project.
    pub fn normalize(&mut self) {
        if let Cmd::Build(BuildCmd { projects, .. }) | Cmd::Iwyu(IwyuCmd { projects, .. }) = &mut self.cmd {
            projects.retain(|id| !id.is_empty());
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Cmd {
    /// Configure and build projects, optionally building and running their tests.
    Build(BuildCmd),

    /// Run include-what-you-use over projects and fix their includes.
    ///
    /// Needs the compile_commands.json a previous build copied into each
    /// project's code folder.
    Iwyu(IwyuCmd),

    /// Build the bootable image and boot it in QEMU.
    Qemu(QemuCmd),

    /// Build the bootable image and write it to a device.
    Hardware(HardwareCmd),

    /// Check that the external tools are on PATH.
    Doctor,

    /// List the registered projects.
    Projects {
        /// Print the full descriptors as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Axes shared by everything that ends up in a build directory.
#[derive(Clone, Copy, Debug, Args)]
pub struct ConfigArgs {
    #[arg(short = 'm', long, value_enum, default_value_t = BuildMode::Debug)]
    pub build_mode: BuildMode,

    #[arg(short, long, value_enum, default_value_t = Architecture::X86)]
    pub architecture: Architecture,

    /// Build with serial output enabled
    #[arg(long)]
    pub serial: bool,
}

#[derive(Debug, Args)]
pub struct BuildCmd {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Projects to build, comma separated (default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub projects: Vec<String>,

    /// Override every selected project's environment
    #[arg(short, long, value_enum)]
    pub environment: Option<Environment>,

    /// Parallel jobs passed to the build tool
    #[arg(short, long, default_value_t = default_threads())]
    pub threads: NonZeroUsize,

    /// Targets to build instead of each project's targets.txt, comma separated
    #[arg(long, value_delimiter = ',')]
    pub targets: Vec<String>,

    #[arg(long)]
    pub build_tests: bool,

    /// Run the test executables after building (implies nothing without --build-tests)
    #[arg(long)]
    pub run_tests: bool,

    /// Also write each project's tool errors to <code>/stderr.txt
    #[arg(long)]
    pub errors_to_file: bool,

    /// Keep building the remaining projects after a failure
    #[arg(long)]
    pub keep_going: bool,
}

impl BuildCmd {
    pub fn to_args(&self, verbose: bool) -> BuildArgs {
        BuildArgs {
            build_mode: self.config.build_mode,
            environment: self.environment,
            errors_to_file: self.errors_to_file,
            threads: self.threads.get(),
            selected_targets: self.targets.clone(),
            selected_projects: self.projects.clone(),
            build_tests: self.build_tests,
            run_tests: self.run_tests,
            architecture: self.config.architecture,
            serial: self.config.serial,
            verbose,
            policy: if self.keep_going {
                FailurePolicy::Continue
            } else {
                FailurePolicy::Abort
            },
        }
    }
}

#[derive(Debug, Args)]
pub struct IwyuCmd {
    /// Projects to analyse, comma separated (default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub projects: Vec<String>,

    /// Analyse as if every project targeted this environment
    #[arg(short, long, value_enum)]
    pub environment: Option<Environment>,

    /// Apply the suggested changes instead of only showing them
    #[arg(short, long)]
    pub wet_run: bool,
}

#[derive(Debug, Args)]
pub struct QemuCmd {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Wait for a debugger on tcp::1234 and emulate the CPU instead of using KVM
    #[arg(short, long)]
    pub debug: bool,

    /// Open an emulator window
    #[arg(short, long)]
    pub graphic: bool,

    /// Also write the emulator's error output to <repo>/qemu.log
    #[arg(short = 'f', long = "file")]
    pub output_to_file: bool,
}

impl QemuCmd {
    pub fn to_args(&self, verbose: bool) -> QemuArgs {
        QemuArgs {
            verbose,
            debug: self.debug,
            graphic: self.graphic,
            output_to_file: self.output_to_file,
        }
    }
}

#[derive(Debug, Args)]
pub struct HardwareCmd {
    /// Device or file to write the image to, e.g. /dev/sdc1
    #[arg(short = 'f', long = "file")]
    pub device: PathBuf,
}
