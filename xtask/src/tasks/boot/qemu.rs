use crate::app::Workspace;
use crate::build::BuildArgs;
use crate::cli::{Exit, QemuCmd};
use crate::process::ProcessRunner;
use crate::qemu;
use anyhow::Result;

pub fn run(ws: &Workspace, runner: &mut dyn ProcessRunner, cmd: &QemuCmd, verbose: bool) -> Result<Exit> {
    let args = BuildArgs {
        build_mode: cmd.config.build_mode,
        architecture: cmd.config.architecture,
        serial: cmd.config.serial,
        verbose,
        ..BuildArgs::run_set()
    };
    let exit = super::prepare_image(ws, runner, &args)?;
    if exit != Exit::Success {
        return Ok(exit);
    }

    eprintln!("[step] Booting {}", ws.layout.uefi_image().display());
    qemu::run(runner, &ws.layout, cmd.to_args(verbose))?;
    Ok(Exit::Success)
}
