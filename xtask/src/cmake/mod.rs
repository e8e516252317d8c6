//! CMake configure/build step assembly.

mod options;
mod targets;

pub use options::{
    build_options, configure_options, BuildStep, CmakeArg, CmakeOptions, ConfigureRequest,
    EXECUTABLE,
};
pub use targets::{resolve, TargetSet};
