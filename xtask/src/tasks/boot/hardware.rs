use crate::app::Workspace;
use crate::build::BuildArgs;
use crate::cli::Exit;
use crate::image;
use crate::process::ProcessRunner;
use anyhow::Result;
use std::path::Path;

pub fn run(ws: &Workspace, runner: &mut dyn ProcessRunner, device: &Path) -> Result<Exit> {
    let exit = super::prepare_image(ws, runner, &BuildArgs::run_set())?;
    if exit != Exit::Success {
        return Ok(exit);
    }

    eprintln!("[step] Writing image to {}", device.display());
    runner.run(&image::write_to_device(&ws.layout.uefi_image(), device), &mut [])?;
    eprintln!("[ok] {}", device.display());
    Ok(Exit::Success)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::build::TEST_NAME_MARKER;
    use crate::process::testing::RecordingRunner;
    use crate::project::{build_directory, targets_file, Registry, IMAGE_BUILDER, KERNEL, OS_LOADER, RUN_SET};
    use crate::util::repo::RepoLayout;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn workspace(dir: &TempDir) -> Workspace {
        let layout = RepoLayout::new(dir.path());
        let registry = Registry::flos(&layout).unwrap();
        Workspace { layout, registry }
    }

    #[test]
    fn test_builds_run_set_assembles_and_writes() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);
        let args = BuildArgs::run_set();
        for (id, file) in [(OS_LOADER, OS_LOADER), (KERNEL, "kernel.bin"), (IMAGE_BUILDER, IMAGE_BUILDER)] {
            let project = ws.registry.get(id).unwrap();
            let manifest = targets_file(&project.code_folder);
            fs::create_dir_all(manifest.parent().unwrap()).unwrap();
            fs::write(&manifest, format!("{file}\n")).unwrap();
            let out = build_directory(project, args.build_mode, args.architecture, args.serial);
            fs::create_dir_all(&out).unwrap();
            fs::write(out.join(file), "").unwrap();
            fs::set_permissions(out.join(file), fs::Permissions::from_mode(0o755)).unwrap();
        }
        let mut runner = RecordingRunner::new();

        let exit = run(&ws, &mut runner, Path::new("/dev/sdc1")).unwrap();

        assert_eq!(exit, Exit::Success);
        let programs = runner.programs();
        assert_eq!(programs.iter().filter(|p| **p == "cmake").count(), RUN_SET.len() * 2);
        assert!(programs[programs.len() - 2].ends_with(IMAGE_BUILDER));
        assert_eq!(programs[programs.len() - 1], "sudo");
        assert!(!programs.iter().any(|p| p.contains(TEST_NAME_MARKER)));
    }

    #[test]
    fn test_build_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);
        let mut runner = RecordingRunner::new().fail_when(|inv| inv.program() == "cmake");

        let exit = run(&ws, &mut runner, Path::new("/dev/sdc1")).unwrap();

        assert_eq!(exit, Exit::TargetError);
        assert!(!runner.programs().contains(&"sudo"));
    }
}
