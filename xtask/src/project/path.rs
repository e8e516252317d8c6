//! Build output locations.
//!
//! Every configuration axis owns exactly one path segment, in a fixed order,
//! so two configurations share a build directory only when all axes agree.

use super::{Architecture, BuildMode, Environment, ProjectDescriptor};
use std::path::{Path, PathBuf};

/// One fully specified build configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BuildAxes<'a> {
    pub architecture: Architecture,
    pub compiler: &'a str,
    pub linker: &'a str,
    pub environment: Environment,
    pub float_operations: bool,
    pub serial: bool,
    pub build_mode: BuildMode,
}

impl<'a> BuildAxes<'a> {
    pub fn for_project(
        project: &'a ProjectDescriptor,
        build_mode: BuildMode,
        architecture: Architecture,
        serial: bool,
    ) -> Self {
        Self {
            architecture,
            compiler: &project.compiler,
            linker: &project.linker,
            environment: project.environment,
            float_operations: project.float_operations,
            serial,
            build_mode,
        }
    }

    /// Path segments in canonical order.
    pub fn segments(&self) -> [&str; 7] {
        [
            self.architecture.as_str(),
            self.compiler,
            self.linker,
            self.environment.as_str(),
            if self.float_operations { "with-floats" } else { "no-floats" },
            if self.serial { "serial" } else { "no-serial" },
            self.build_mode.as_str(),
        ]
    }

    /// `build/<arch>/<compiler>/<linker>/<env>/<floats>/<serial>/<mode>`
    pub fn output_path(&self) -> PathBuf {
        let mut path = PathBuf::from("build");
        path.extend(self.segments());
        path
    }
}

/// Build directory of `project` for the given configuration.
pub fn build_directory(
    project: &ProjectDescriptor,
    build_mode: BuildMode,
    architecture: Architecture,
    serial: bool,
) -> PathBuf {
    let axes = BuildAxes::for_project(project, build_mode, architecture, serial);
    project.code_folder.join(axes.output_path())
}

/// Target manifest written by the configure step.
pub fn targets_file(code_folder: &Path) -> PathBuf {
    code_folder.join("build").join("targets.txt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iwyu::Mapping;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn project(id: &str, environment: Environment, float_operations: bool) -> ProjectDescriptor {
        let folder = PathBuf::from("/repo/projects").join(id);
        ProjectDescriptor {
            id: id.to_string(),
            compiler: "clang-19".into(),
            linker: "ld.lld-19".into(),
            code_folder: folder.join("code"),
            folder,
            environment,
            float_operations,
            excluded_mappings: vec![Mapping::Architecture],
        }
    }

    #[test]
    fn test_canonical_layout() {
        let kernel = project("kernel", Environment::Freestanding, true);
        assert_eq!(
            build_directory(&kernel, BuildMode::Debug, Architecture::X86, false),
            PathBuf::from(
                "/repo/projects/kernel/code/build/X86/clang-19/ld.lld-19/freestanding/with-floats/no-serial/DEBUG"
            )
        );
    }

    #[test]
    fn test_deterministic() {
        let kernel = project("kernel", Environment::Freestanding, true);
        let first = build_directory(&kernel, BuildMode::Release, Architecture::X86, true);
        let second = build_directory(&kernel, BuildMode::Release, Architecture::X86, true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_each_axis_changes_exactly_one_segment() {
        let base = BuildAxes {
            architecture: Architecture::X86,
            compiler: "clang-19",
            linker: "ld.lld-19",
            environment: Environment::Freestanding,
            float_operations: true,
            serial: false,
            build_mode: BuildMode::Debug,
        };
        let variants = [
            BuildAxes { compiler: "gcc-14", ..base },
            BuildAxes { linker: "lld-link-19", ..base },
            BuildAxes { environment: Environment::Efi, ..base },
            BuildAxes { float_operations: false, ..base },
            BuildAxes { serial: true, ..base },
            BuildAxes { build_mode: BuildMode::Release, ..base },
        ];

        let mut seen = HashSet::from([base.output_path()]);
        for variant in variants {
            let differing = base
                .segments()
                .iter()
                .zip(variant.segments())
                .filter(|(a, b)| **a != *b)
                .count();
            assert_eq!(differing, 1, "{variant:?}");
            assert!(seen.insert(variant.output_path()), "{variant:?}");
        }
    }

    #[test]
    fn test_two_projects_differ_only_in_env_and_floats() {
        let a = project("A", Environment::Freestanding, true);
        let b = ProjectDescriptor {
            environment: Environment::Posix,
            float_operations: false,
            ..a.clone()
        };

        let path_a = build_directory(&a, BuildMode::Debug, Architecture::X86, false);
        let path_b = build_directory(&b, BuildMode::Debug, Architecture::X86, false);
        assert_ne!(path_a, path_b);

        let a_parts: Vec<_> = path_a.components().collect();
        let b_parts: Vec<_> = path_b.components().collect();
        assert_eq!(a_parts.len(), b_parts.len());
        let differing: Vec<_> = a_parts
            .iter()
            .zip(&b_parts)
            .filter(|(x, y)| x != y)
            .map(|(_, y)| y.as_os_str().to_string_lossy().into_owned())
            .collect();
        assert_eq!(differing, ["posix", "no-floats"]);
        assert!(path_b.starts_with(&a.code_folder));
    }

    #[test]
    fn test_targets_file_location() {
        assert_eq!(
            targets_file(Path::new("/repo/projects/kernel/code")),
            PathBuf::from("/repo/projects/kernel/code/build/targets.txt")
        );
    }
}
