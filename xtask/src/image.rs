//! Bootable UEFI image assembly and writing it to a device.

use crate::process::{Invocation, ProcessRunner};
use crate::project::{build_directory, Architecture, BuildMode, Registry, IMAGE_BUILDER, KERNEL, OS_LOADER};
use crate::util::fs::find_executables;
use crate::util::repo::RepoLayout;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const KERNEL_BINARY: &str = "kernel.bin";

/// Physical memory, in MiB, the image is laid out for.
const PHYSICAL_MEMORY_MB: &str = "512";

/// Copies the EFI loader and kernel out of their build directories, then
/// lets `image-builder` produce the bootable image at the repo root.
pub fn create_uefi_image(
    runner: &mut dyn ProcessRunner,
    registry: &Registry,
    layout: &RepoLayout,
    build_mode: BuildMode,
    architecture: Architecture,
    serial: bool,
) -> Result<()> {
    let locate = |project: &str, file_name: &str| -> Result<PathBuf> {
        let descriptor = registry
            .get(project)
            .with_context(|| format!("project {project} is not registered"))?;
        let dir = build_directory(descriptor, build_mode, architecture, serial);
        find_executables(&dir, |name| name == file_name)
            .into_iter()
            .next()
            .with_context(|| format!("no {file_name} executable under {}, was {project} built?", dir.display()))
    };

    copy(&locate(OS_LOADER, OS_LOADER)?, &layout.efi_file())?;
    copy(&locate(KERNEL, KERNEL_BINARY)?, &layout.kernel_file())?;

    let image_builder = locate(IMAGE_BUILDER, IMAGE_BUILDER)?;
    let inv = Invocation::new(image_builder.display().to_string())
        .args(["--phys", PHYSICAL_MEMORY_MB, "--efi"])
        .path_arg(&layout.efi_file())
        .arg("--kernel")
        .path_arg(&layout.kernel_file())
        .current_dir(layout.root());
    runner.run(&inv, &mut [])?;

    tracing::info!(image = %layout.uefi_image().display(), "created UEFI image");
    Ok(())
}

fn copy(from: &Path, to: &Path) -> Result<()> {
    tracing::debug!(from = %from.display(), to = %to.display(), "copying");
    fs::copy(from, to).with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
    Ok(())
}

/// `sudo dd if=<image> of=<device> conv=notrunc`
pub fn write_to_device(image: &Path, device: &Path) -> Invocation {
    Invocation::new("sudo")
        .arg("dd")
        .arg(format!("if={}", image.display()))
        .arg(format!("of={}", device.display()))
        .arg("conv=notrunc")
}
