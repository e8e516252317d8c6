use crate::app::Workspace;
use crate::cli::Exit;
use anyhow::{bail, Result};
use std::collections::BTreeSet;

/// Tools every workflow needs besides the per-project compilers and linkers.
const TOOLS: &[&str] = &[
    crate::cmake::EXECUTABLE,
    crate::iwyu::EXECUTABLE,
    crate::qemu::EXECUTABLE,
    "python3",
];

pub fn run(ws: &Workspace) -> Result<Exit> {
    let mut ok = true;

    for tool in required_tools(ws) {
        if which::which(tool).is_err() {
            eprintln!("[FAIL] missing `{tool}` in PATH");
            ok = false;
        } else {
            eprintln!("[OK] {tool}");
        }
    }

    let layout = &ws.layout;
    let want_files = [layout.fix_includes_script(), layout.bios_file()];
    for f in want_files {
        if f.is_file() {
            eprintln!("[OK] {}", f.display());
        } else {
            eprintln!("[FAIL] missing file: {}", f.display());
            ok = false;
        }
    }

    let mappings = layout.iwyu_mappings();
    if mappings.is_dir() {
        eprintln!("[OK] {}", mappings.display());
    } else {
        eprintln!("[FAIL] missing directory: {}", mappings.display());
        ok = false;
    }

    if !ok {
        bail!("doctor checks failed");
    }
    Ok(Exit::Success)
}

fn required_tools(ws: &Workspace) -> BTreeSet<&str> {
    let mut tools: BTreeSet<&str> = TOOLS.iter().copied().collect();
    for id in ws.registry.ids() {
        if let Some(project) = ws.registry.get(id) {
            tools.insert(&project.compiler);
            tools.insert(&project.linker);
        }
    }
    tools
}
