use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Fixed locations inside the FLOS repository.
///
/// Everything the tooling reads or writes outside of a project's own build
/// directory hangs off the repo root, so tests can point a layout at a
/// temporary directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Uses `explicit` when given (CLI flag or `FLOS_REPO_ROOT`), otherwise
    /// the directory containing this crate's workspace.
    pub fn discover(explicit: Option<PathBuf>) -> Result<Self> {
        match explicit {
            Some(root) => Ok(Self::new(root)),
            None => repo_root().map(Self::new),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn projects(&self) -> PathBuf {
        self.root.join("projects")
    }

    pub fn dependencies(&self) -> PathBuf {
        self.root.join("dependencies")
    }

    pub fn iwyu_mappings(&self) -> PathBuf {
        self.root.join("iwyu-mappings")
    }

    pub fn fix_includes_script(&self) -> PathBuf {
        self.dependencies()
            .join("include-what-you-use/fix_includes.py")
    }

    pub fn efi_file(&self) -> PathBuf {
        self.root.join("BOOTX64.EFI")
    }

    pub fn kernel_file(&self) -> PathBuf {
        self.root.join("kernel.bin")
    }

    pub fn uefi_image(&self) -> PathBuf {
        self.root.join("FLOS_UEFI_IMAGE.hdd")
    }

    pub fn bios_file(&self) -> PathBuf {
        self.root.join("bios.bin")
    }

    pub fn qemu_log(&self) -> PathBuf {
        self.root.join("qemu.log")
    }
}

pub fn repo_root() -> Result<PathBuf> {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask is expected at <repo>/xtask")
}
