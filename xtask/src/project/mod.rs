//! FLOS projects and their build configuration.

mod axes;
mod path;
mod registry;

pub use axes::{Architecture, BuildMode, Environment};
pub use path::{build_directory, targets_file, BuildAxes};
pub use registry::{
    ProjectDescriptor, Registry, RegistryError, Toolchain, EFI_SYSTEM, ELF, IMAGE_BUILDER, KERNEL,
    OS_LOADER, RUN_SET,
};
