//! Which CMake targets a build step should ask for.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetSet {
    /// Given by the caller; the manifest was not consulted.
    Explicit(Vec<String>),
    /// Read from the manifest, in file order.
    Manifest(Vec<String>),
    /// The manifest could not be read.
    Missing { reason: String },
    /// The manifest exists but names no targets.
    Empty,
}

impl TargetSet {
    pub fn found(&self) -> bool {
        matches!(self, Self::Explicit(_) | Self::Manifest(_))
    }

    pub fn names(&self) -> &[String] {
        match self {
            Self::Explicit(names) | Self::Manifest(names) => names,
            Self::Missing { .. } | Self::Empty => &[],
        }
    }
}

/// Explicit targets always win. Otherwise every non-empty line of the
/// manifest is one target name, kept exactly as written.
pub fn resolve(explicit: &[String], manifest: &Path) -> TargetSet {
    if !explicit.is_empty() {
        return TargetSet::Explicit(explicit.to_vec());
    }

    match read_manifest(manifest) {
        Ok(names) if names.is_empty() => TargetSet::Empty,
        Ok(names) => TargetSet::Manifest(names),
        Err(err) => TargetSet::Missing {
            reason: format!("{}: {err}", manifest.display()),
        },
    }
}

fn read_manifest(manifest: &Path) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(manifest)?);
    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.is_empty() {
            names.push(line);
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn manifest(contents: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("targets.txt");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_explicit_targets_win() {
        let (_dir, path) = manifest("a\nb\n");
        let explicit = vec!["kernel.bin".to_string(), "x".to_string()];
        let set = resolve(&explicit, &path);
        assert!(set.found());
        assert_eq!(set, TargetSet::Explicit(explicit));
    }

    #[test]
    fn test_manifest_order_preserved() {
        let (_dir, path) = manifest("a\nb\nc\n");
        let set = resolve(&[], &path);
        assert!(set.found());
        assert_eq!(set.names(), ["a", "b", "c"]);
    }

    #[test]
    fn test_empty_manifest_is_not_found() {
        let (_dir, path) = manifest("");
        let set = resolve(&[], &path);
        assert_eq!(set, TargetSet::Empty);
        assert!(!set.found());
        assert!(set.names().is_empty());
    }

    #[test]
    fn test_missing_manifest_is_not_found() {
        let dir = TempDir::new().unwrap();
        let set = resolve(&[], &dir.path().join("targets.txt"));
        assert!(matches!(set, TargetSet::Missing { .. }));
        assert!(!set.found());
    }

    #[test]
    fn test_lines_are_not_trimmed() {
        let (_dir, path) = manifest("a\n\n  \nb \n");
        let set = resolve(&[], &path);
        assert_eq!(set.names(), ["a", "  ", "b "]);
    }
}
