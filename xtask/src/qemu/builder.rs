//! QEMU command builder
//!
//! Fluent builder so the emulator command line is assembled in one place.

use crate::process::Invocation;
use std::path::PathBuf;

pub const EXECUTABLE: &str = "qemu-system-x86_64";

/// How the guest CPU is provided.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CpuMode {
    /// Host CPU through KVM
    #[default]
    Kvm,
    /// Emulated CPU, frozen at startup with a GDB server on :1234
    Debug,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Emulated VGA window
    #[default]
    Window,
    /// display=none, serial only
    Headless,
}

/// QEMU command builder with fluent API
#[derive(Clone, Debug)]
pub struct QemuBuilder {
    image: PathBuf,
    firmware: PathBuf,
    memory_mb: u32,
    cpu: CpuMode,
    display: DisplayMode,
    trace_interrupts: bool,
}

impl QemuBuilder {
    /// Boots `image` as a raw drive with `firmware` as BIOS.
    pub fn new(image: impl Into<PathBuf>, firmware: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            firmware: firmware.into(),
            memory_mb: 512,
            cpu: CpuMode::default(),
            display: DisplayMode::default(),
            trace_interrupts: false,
        }
    }

    pub fn cpu(mut self, cpu: CpuMode) -> Self {
        self.cpu = cpu;
        self
    }

    pub fn display(mut self, display: DisplayMode) -> Self {
        self.display = display;
        self
    }

    /// Log interrupts and CPU resets (`-d int,cpu_reset`).
    pub fn trace_interrupts(mut self, enabled: bool) -> Self {
        self.trace_interrupts = enabled;
        self
    }

    pub fn build(self) -> Invocation {
        let mut inv = Invocation::new(EXECUTABLE)
            .args(["-m".to_string(), self.memory_mb.to_string()])
            .args(["-machine", "q35"])
            .arg("-no-reboot")
            .arg("-drive")
            .arg(format!("format=raw,file={}", self.image.display()))
            .arg("-bios")
            .path_arg(&self.firmware)
            .args(["-serial", "stdio"])
            .args(["-smp", "1"])
            .arg("-usb")
            .args(["-vga", "std"]);

        if self.trace_interrupts {
            inv = inv.args(["-d", "int,cpu_reset"]);
        }

        inv = match self.cpu {
            // -s: gdb on tcp::1234, -S: freeze CPU at startup
            CpuMode::Debug => inv
                .args(["-s", "-S"])
                .args(["-cpu", "Haswell-v4"])
                .args(["-accel", "tcg"]),
            CpuMode::Kvm => inv.args(["-cpu", "host"]).arg("-enable-kvm"),
        };

        if self.display == DisplayMode::Headless {
            inv = inv.args(["-display", "none"]);
        }
        inv
    }
}
