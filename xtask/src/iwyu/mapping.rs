//! IWYU mapping catalogue and flag composition.
//!
//! The configure step embeds these flags in `CMAKE_C_INCLUDE_WHAT_YOU_USE`
//! and the standalone IWYU run passes them as argv; both render from the
//! same [`AnalysisFlags`] value.

use crate::project::Environment;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// A mapping file shipped under `<repo>/iwyu-mappings`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mapping {
    MemoryManipulation,
    Architecture,
}

impl Mapping {
    /// Catalogue order. Composition always follows this order.
    pub const CATALOGUE: [Mapping; 2] = [Mapping::MemoryManipulation, Mapping::Architecture];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::MemoryManipulation => "memory-manipulation.imp",
            Self::Architecture => "architecture.imp",
        }
    }
}

const IWYU_PREFIX: &str = "-Xiwyu";
const NO_DEFAULT_MAPPINGS: &str = "--no_default_mappings";

/// Ordered IWYU options, each of which is passed behind `-Xiwyu`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalysisFlags {
    flags: Vec<String>,
}

impl AnalysisFlags {
    /// The raw IWYU options, without the `-Xiwyu` prefix.
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// Argv form: `-Xiwyu <flag> -Xiwyu <flag> ...`.
    pub fn to_args(&self) -> Vec<String> {
        self.flags
            .iter()
            .flat_map(|flag| [IWYU_PREFIX.to_string(), flag.clone()])
            .collect()
    }

    /// CMake list form: `-Xiwyu;<flag>;-Xiwyu;<flag>;`.
    pub fn to_cmake_list(&self) -> String {
        self.to_args().iter().map(|arg| format!("{arg};")).collect()
    }
}

impl fmt::Display for AnalysisFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_args().join(" "))
    }
}

pub fn compose(environment: Environment, excluded: &[Mapping], mappings_root: &Path) -> AnalysisFlags {
    let mut flags = Vec::new();
    if environment.disables_default_mappings() {
        flags.push(NO_DEFAULT_MAPPINGS.to_string());
    }

    for mapping in Mapping::CATALOGUE {
        if excluded.contains(&mapping) {
            continue;
        }
        flags.push(format!(
            "--mapping_file={}",
            mappings_root.join(mapping.file_name()).display()
        ));
    }

    AnalysisFlags { flags }
}
