use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod app;
mod build;
mod cli;
mod cmake;
mod image;
mod iwyu;
mod process;
mod project;
mod qemu;
mod tasks;
mod util;

use crate::cli::{Cli, Exit};

/// Overrides the log filter, e.g. `FLOS_LOG=debug` or `FLOS_LOG=tool_output=off`.
const LOG_ENV: &str = "FLOS_LOG";

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return Exit::for_clap_error(&err).into();
        }
    };

    init_tracing(cli.verbose);

    match app::run(cli) {
        Ok(exit) => exit.into(),
        Err(err) => {
            tracing::error!("{err:#}");
            Exit::InternalError.into()
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
