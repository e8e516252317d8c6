//! QEMU support

mod builder;

pub use builder::{CpuMode, DisplayMode, QemuBuilder, EXECUTABLE};

use crate::process::ProcessRunner;
use crate::util::repo::RepoLayout;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;

#[derive(Clone, Copy, Debug, Default)]
pub struct QemuArgs {
    pub verbose: bool,
    pub debug: bool,
    /// Open an emulator window; headless otherwise.
    pub graphic: bool,
    /// Tee the emulator's stderr into `<repo>/qemu.log`.
    pub output_to_file: bool,
}

/// Boots the assembled UEFI image.
pub fn run(runner: &mut dyn ProcessRunner, layout: &RepoLayout, args: QemuArgs) -> Result<()> {
    let inv = QemuBuilder::new(layout.uefi_image(), layout.bios_file())
        .trace_interrupts(args.verbose)
        .cpu(if args.debug { CpuMode::Debug } else { CpuMode::Kvm })
        .display(if args.graphic {
            DisplayMode::Window
        } else {
            DisplayMode::Headless
        })
        .build();

    let mut log = if args.output_to_file {
        let path = layout.qemu_log();
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {} to redirect QEMU to", path.display()))?;
        Some(file)
    } else {
        None
    };
    let mut sinks: Vec<&mut dyn Write> = log.iter_mut().map(|f| f as &mut dyn Write).collect();

    if args.debug {
        tracing::info!("waiting for a debugger on tcp::1234");
    }
    runner.run(&inv, &mut sinks)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::RecordingRunner;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_boots_layout_image() {
        let dir = TempDir::new().unwrap();
        let layout = RepoLayout::new(dir.path());
        let mut runner = RecordingRunner::new();

        let args = QemuArgs {
            graphic: true,
            ..QemuArgs::default()
        };
        run(&mut runner, &layout, args).unwrap();

        let inv = &runner.calls[0];
        assert_eq!(inv.program(), EXECUTABLE);
        assert!(inv.has_arg(&format!("format=raw,file={}", layout.uefi_image().display())));
        assert!(inv.has_arg(&layout.bios_file().display().to_string()));
        assert!(!inv.has_arg("-display"));
        assert!(!layout.qemu_log().exists());
    }

    #[test]
    fn test_output_to_file_writes_log() {
        let dir = TempDir::new().unwrap();
        let layout = RepoLayout::new(dir.path());
        let mut runner = RecordingRunner::new();
        let args = QemuArgs {
            output_to_file: true,
            ..QemuArgs::default()
        };

        run(&mut runner, &layout, args).unwrap();

        assert!(runner.calls[0].has_arg("none"));
        assert_eq!(fs::read_to_string(layout.qemu_log()).unwrap(), format!("{EXECUTABLE}\n"));
    }
}
