//! Project registry - single source of truth for every buildable FLOS project.

use super::Environment::{self, Efi, Freestanding, Posix};
use crate::iwyu::Mapping::{self, Architecture as ARCH, MemoryManipulation as MEM};
use crate::util::repo::RepoLayout;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const KERNEL: &str = "kernel";
pub const OS_LOADER: &str = "os-loader";
pub const IMAGE_BUILDER: &str = "image-builder";

/// Projects needed to assemble a bootable image.
pub const RUN_SET: [&str; 3] = [KERNEL, IMAGE_BUILDER, OS_LOADER];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Toolchain {
    pub compiler: &'static str,
    pub linker: &'static str,
}

pub const ELF: Toolchain = Toolchain {
    compiler: "clang-19",
    linker: "ld.lld-19",
};

pub const EFI_SYSTEM: Toolchain = Toolchain {
    compiler: "clang-19",
    linker: "lld-link-19",
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectDescriptor {
    pub id: String,
    pub compiler: String,
    pub linker: String,
    pub folder: PathBuf,
    pub code_folder: PathBuf,
    pub environment: Environment,
    pub float_operations: bool,
    pub excluded_mappings: Vec<Mapping>,
}

impl ProjectDescriptor {
    /// Copy of this descriptor with the caller's environment override applied.
    pub fn with_environment(&self, environment: Option<Environment>) -> Self {
        let mut project = self.clone();
        if let Some(environment) = environment {
            project.environment = environment;
        }
        project
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("project `{0}` is registered more than once")]
    Duplicate(String),
    #[error("project `{id}` lives outside the projects root: {}", folder.display())]
    OutsideRoot { id: String, folder: PathBuf },
    #[error("unknown project(s): {}", .0.join(", "))]
    Unknown(Vec<String>),
}

struct Entry {
    id: &'static str,
    toolchain: Toolchain,
    folder: &'static str,
    code: &'static str,
    environment: Environment,
    float_operations: bool,
    excluded: &'static [Mapping],
}

const fn entry(
    id: &'static str,
    toolchain: Toolchain,
    folder: &'static str,
    environment: Environment,
    excluded: &'static [Mapping],
) -> Entry {
    Entry {
        id,
        toolchain,
        folder,
        code: "code",
        environment,
        float_operations: true,
        excluded,
    }
}

// If you add a project, add it here.
const TABLE: &[Entry] = &[
    entry(KERNEL, ELF, "kernel", Freestanding, &[]),
    entry("efi-to-kernel", ELF, "efi-to-kernel", Efi, &[]),
    Entry {
        float_operations: false,
        ..entry(OS_LOADER, EFI_SYSTEM, "os-loader", Efi, &[])
    },
    entry("efi", EFI_SYSTEM, "efi", Efi, &[]),
    entry(IMAGE_BUILDER, ELF, "image-builder", Posix, &[]),
    entry("shared", ELF, "shared", Freestanding, &[]),
    entry("posix", ELF, "posix", Posix, &[MEM]),
    entry("x86", ELF, "x86", Freestanding, &[ARCH]),
    entry("x86-kernel", ELF, "x86/kernel", Freestanding, &[ARCH]),
    entry("x86-efi", EFI_SYSTEM, "x86/efi", Efi, &[ARCH]),
    entry("x86-efi-to-kernel", EFI_SYSTEM, "x86/efi-to-kernel", Freestanding, &[ARCH]),
    entry("efi-uefi", ELF, "efi/uefi", Freestanding, &[]),
    entry("freestanding", ELF, "freestanding", Freestanding, &[MEM]),
    Entry {
        code: "",
        ..entry("abstraction", ELF, "abstraction", Freestanding, &[])
    },
    entry("mapping-test", ELF, "mapping-test", Posix, &[MEM]),
];

/// Immutable set of projects, keyed by identifier.
#[derive(Clone, Debug)]
pub struct Registry {
    projects_root: PathBuf,
    projects: BTreeMap<String, ProjectDescriptor>,
}

impl Registry {
    /// The fixed FLOS project table rooted at `layout`.
    pub fn flos(layout: &RepoLayout) -> Result<Self, RegistryError> {
        let projects_root = layout.projects();
        let descriptors = TABLE.iter().map(|e| {
            let folder = projects_root.join(e.folder);
            let code_folder = if e.code.is_empty() {
                folder.clone()
            } else {
                folder.join(e.code)
            };
            ProjectDescriptor {
                id: e.id.to_string(),
                compiler: e.toolchain.compiler.to_string(),
                linker: e.toolchain.linker.to_string(),
                folder,
                code_folder,
                environment: e.environment,
                float_operations: e.float_operations,
                excluded_mappings: e.excluded.to_vec(),
            }
        });
        Self::from_descriptors(&projects_root, descriptors)
    }

    pub fn from_descriptors(
        projects_root: &Path,
        descriptors: impl IntoIterator<Item = ProjectDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut projects = BTreeMap::new();
        for project in descriptors {
            if !project.folder.starts_with(projects_root)
                || !project.code_folder.starts_with(projects_root)
            {
                return Err(RegistryError::OutsideRoot {
                    id: project.id,
                    folder: project.folder,
                });
            }
            if projects.contains_key(&project.id) {
                return Err(RegistryError::Duplicate(project.id));
            }
            projects.insert(project.id.clone(), project);
        }
        Ok(Self {
            projects_root: projects_root.to_path_buf(),
            projects,
        })
    }

    pub fn projects_root(&self) -> &Path {
        &self.projects_root
    }

    pub fn get(&self, id: &str) -> Option<&ProjectDescriptor> {
        self.projects.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    /// Rejects identifiers that are not registered. The CLI calls this
    /// before anything is selected or invoked.
    pub fn validate<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), RegistryError> {
        let unknown: Vec<String> = ids
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| !self.projects.contains_key(*id))
            .map(str::to_string)
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Unknown(unknown))
        }
    }

    /// Empty `ids` selects every project. Unknown identifiers are absent
    /// from the result; see [`Registry::validate`].
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> BTreeMap<&str, &ProjectDescriptor> {
        if ids.is_empty() {
            return self
                .projects
                .iter()
                .map(|(id, project)| (id.as_str(), project))
                .collect();
        }

        ids.iter()
            .filter_map(|id| self.projects.get_key_value(id.as_ref()))
            .map(|(id, project)| (id.as_str(), project))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flos() -> Registry {
        Registry::flos(&RepoLayout::new("/repo")).unwrap()
    }

    #[test]
    fn test_select_empty_returns_everything() {
        let registry = flos();
        let all = registry.select::<&str>(&[]);
        assert_eq!(all.len(), TABLE.len());
        assert_eq!(all.len(), registry.ids().count());
    }

    #[test]
    fn test_select_exact_entries() {
        let registry = flos();
        let one = registry.select(&["kernel"]);
        assert_eq!(one.len(), 1);
        assert_eq!(one["kernel"].environment, Environment::Freestanding);

        let three = registry.select(&RUN_SET);
        assert_eq!(three.len(), RUN_SET.len());
    }

    #[test]
    fn test_select_skips_unknown() {
        let registry = flos();
        let picked = registry.select(&["kernel", "nope"]);
        assert_eq!(picked.keys().copied().collect::<Vec<_>>(), ["kernel"]);
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_validate_reports_every_unknown_id() {
        let registry = flos();
        assert!(registry.validate(&["kernel", "os-loader"]).is_ok());
        assert_eq!(
            registry.validate(&["kernel", "a", "b"]),
            Err(RegistryError::Unknown(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn test_table_shape() {
        let registry = flos();
        let loader = registry.get(OS_LOADER).unwrap();
        assert!(!loader.float_operations);
        assert_eq!(loader.linker, "lld-link-19");
        assert_eq!(loader.code_folder, PathBuf::from("/repo/projects/os-loader/code"));

        let abstraction = registry.get("abstraction").unwrap();
        assert_eq!(abstraction.code_folder, abstraction.folder);

        let x86_efi = registry.get("x86-efi").unwrap();
        assert_eq!(x86_efi.folder, PathBuf::from("/repo/projects/x86/efi"));
        assert_eq!(x86_efi.excluded_mappings, [Mapping::Architecture]);
    }

    #[test]
    fn test_rejects_duplicates_and_foreign_folders() {
        let root = Path::new("/repo/projects");
        let kernel = flos().get(KERNEL).cloned().unwrap();

        let dup = Registry::from_descriptors(root, [kernel.clone(), kernel.clone()]);
        assert_eq!(dup.unwrap_err(), RegistryError::Duplicate("kernel".into()));

        let foreign = ProjectDescriptor {
            folder: PathBuf::from("/tmp/kernel"),
            ..kernel
        };
        assert!(matches!(
            Registry::from_descriptors(root, [foreign]),
            Err(RegistryError::OutsideRoot { .. })
        ));
    }

    #[test]
    fn test_environment_override_leaves_registry_untouched() {
        let registry = flos();
        let kernel = registry.get(KERNEL).unwrap();
        let posix = kernel.with_environment(Some(Environment::Posix));
        assert_eq!(posix.environment, Environment::Posix);
        assert_eq!(registry.get(KERNEL).unwrap().environment, Environment::Freestanding);
        assert_eq!(kernel.with_environment(None), *kernel);
    }

    #[test]
    fn test_descriptor_serializes_with_cli_names() {
        let registry = flos();
        let value = serde_json::to_value(registry.get("posix").unwrap()).unwrap();
        assert_eq!(value["environment"], "posix");
        assert_eq!(value["excluded_mappings"], serde_json::json!(["memory-manipulation"]));
        assert_eq!(value["code_folder"], "/repo/projects/posix/code");
    }
}
