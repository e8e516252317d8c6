use crate::app::Workspace;
use crate::cli::Exit;
use anyhow::{Context, Result};

pub fn run(ws: &Workspace, json: bool) -> Result<Exit> {
    let projects = ws.registry.select::<&str>(&[]);
    if json {
        let descriptors: Vec<_> = projects.values().collect();
        let out = serde_json::to_string_pretty(&descriptors).context("Failed to serialize projects")?;
        println!("{out}");
        return Ok(Exit::Success);
    }

    for (id, project) in &projects {
        let folder = project
            .folder
            .strip_prefix(ws.registry.projects_root())
            .unwrap_or(&project.folder);
        println!("{id:<20} {:<14} {}", project.environment.as_str(), folder.display());
    }
    Ok(Exit::Success)
}
