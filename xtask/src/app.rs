use crate::cli::{Cli, Cmd, Exit};
use crate::process::SystemRunner;
use crate::project::{Registry, RegistryError};
use crate::util::repo::RepoLayout;
use anyhow::Result;
use clap::CommandFactory;

/// Everything a task needs to know about the repository.
pub struct Workspace {
    pub layout: RepoLayout,
    pub registry: Registry,
}

pub fn run(mut cli: Cli) -> Result<Exit> {
    cli.normalize();
    let layout = RepoLayout::discover(cli.repo_root)?;
    let registry = Registry::flos(&layout)?;
    tracing::debug!(root = %layout.root().display(), "repository");

    if let Some((subcommand, ids)) = selected_projects(&cli.cmd) {
        if let Err(err) = registry.validate(ids) {
            usage_error(subcommand, &err);
            return Ok(Exit::MissingArgument);
        }
    }

    let ws = Workspace { layout, registry };
    let mut runner = SystemRunner;
    match cli.cmd {
        Cmd::Build(cmd) => crate::tasks::projects::build::run(&ws, &mut runner, &cmd.to_args(cli.verbose)),
        Cmd::Iwyu(cmd) => crate::tasks::projects::iwyu::run(&ws, &mut runner, &cmd),
        Cmd::Qemu(cmd) => crate::tasks::boot::qemu::run(&ws, &mut runner, &cmd, cli.verbose),
        Cmd::Hardware(cmd) => crate::tasks::boot::hardware::run(&ws, &mut runner, &cmd.device),
        Cmd::Doctor => crate::tasks::tooling::doctor::run(&ws),
        Cmd::Projects { json } => crate::tasks::tooling::projects::run(&ws, json),
    }
}

fn selected_projects(cmd: &Cmd) -> Option<(&'static str, &[String])> {
    match cmd {
        Cmd::Build(cmd) => Some(("build", cmd.projects.as_slice())),
        Cmd::Iwyu(cmd) => Some(("iwyu", cmd.projects.as_slice())),
        _ => None,
    }
}

fn usage_error(subcommand: &str, err: &RegistryError) {
    eprintln!("error: {err}");
    let mut command = Cli::command();
    command.build();
    if let Some(sub) = command.find_subcommand_mut(subcommand) {
        eprintln!("\n{}", sub.render_usage());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_unknown_project_is_a_missing_argument() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["xtask", "--repo-root", root, "build", "-p", "kernel,nope"]).unwrap();
        assert_eq!(run(cli).unwrap(), Exit::MissingArgument);
    }

    #[test]
    fn test_projects_listing_succeeds() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["xtask", "--repo-root", root, "projects"]).unwrap();
        assert_eq!(run(cli).unwrap(), Exit::Success);
    }
}
