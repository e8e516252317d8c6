//! Tasks that need the bootable image.

pub mod hardware;
pub mod qemu;

use crate::app::Workspace;
use crate::build::BuildArgs;
use crate::cli::Exit;
use crate::image;
use crate::process::ProcessRunner;
use anyhow::Result;

/// Builds the run set and assembles the UEFI image from it.
fn prepare_image(ws: &Workspace, runner: &mut dyn ProcessRunner, args: &BuildArgs) -> Result<Exit> {
    let exit = super::projects::build::run(ws, runner, args)?;
    if exit != Exit::Success {
        return Ok(exit);
    }
    eprintln!("[step] Assembling UEFI image");
    image::create_uefi_image(
        runner,
        &ws.registry,
        &ws.layout,
        args.build_mode,
        args.architecture,
        args.serial,
    )?;
    Ok(Exit::Success)
}
