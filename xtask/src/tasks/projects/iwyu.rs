use crate::app::Workspace;
use crate::cli::{Exit, IwyuCmd};
use crate::iwyu::{self, COMPILE_COMMANDS_FILE};
use crate::process::ProcessRunner;
use anyhow::{Context, Result};

pub fn run(ws: &Workspace, runner: &mut dyn ProcessRunner, cmd: &IwyuCmd) -> Result<Exit> {
    eprintln!(
        "[info] environment={} wet-run={}",
        cmd.environment.map_or("per project", |env| env.as_str()),
        cmd.wet_run,
    );

    for (id, project) in ws.registry.select(&cmd.projects) {
        if !project.code_folder.join(COMPILE_COMMANDS_FILE).is_file() {
            eprintln!("[skip] {id}: no {COMPILE_COMMANDS_FILE}, build it first");
            continue;
        }
        eprintln!("[step] Running iwyu on {id}");
        iwyu::run_on_project(runner, &ws.layout, project, cmd.environment, cmd.wet_run)
            .with_context(|| format!("include-what-you-use on {id}"))?;
    }
    Ok(Exit::Success)
}
