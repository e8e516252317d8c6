//! Closed value sets for the build configuration axes.

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Architecture {
    #[default]
    #[value(name = "X86")]
    X86,
}

impl Architecture {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X86 => "X86",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum BuildMode {
    #[default]
    #[value(name = "DEBUG")]
    Debug,
    #[value(name = "RELEASE")]
    Release,
    #[value(name = "PROFILE")]
    Profile,
}

impl BuildMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Release => "RELEASE",
            Self::Profile => "PROFILE",
        }
    }
}

/// Execution context the compiled code targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[value(name = "freestanding")]
    Freestanding,
    #[value(name = "efi")]
    Efi,
    #[value(name = "posix")]
    Posix,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Freestanding => "freestanding",
            Self::Efi => "efi",
            Self::Posix => "posix",
        }
    }

    /// Freestanding and EFI code cannot rely on libc headers, so the
    /// analysis tool must not apply its built-in libc mappings there.
    pub fn disables_default_mappings(self) -> bool {
        matches!(self, Self::Freestanding | Self::Efi)
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Architecture, BuildMode, Environment);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_match_cli_values() {
        for env in Environment::value_variants() {
            let value = env.to_possible_value().unwrap();
            assert_eq!(value.get_name(), env.as_str());
        }
        for mode in BuildMode::value_variants() {
            let value = mode.to_possible_value().unwrap();
            assert_eq!(value.get_name(), mode.as_str());
        }
    }

    #[test]
    fn test_default_mapping_environments() {
        assert!(Environment::Freestanding.disables_default_mappings());
        assert!(Environment::Efi.disables_default_mappings());
        assert!(!Environment::Posix.disables_default_mappings());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Architecture::default().to_string(), "X86");
        assert_eq!(BuildMode::default().to_string(), "DEBUG");
    }
}
