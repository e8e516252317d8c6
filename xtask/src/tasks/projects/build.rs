use crate::app::Workspace;
use crate::build::{BuildArgs, BuildOutcome, BuildReport, Driver};
use crate::cli::Exit;
use crate::process::ProcessRunner;
use anyhow::Result;

pub fn run(ws: &Workspace, runner: &mut dyn ProcessRunner, args: &BuildArgs) -> Result<Exit> {
    eprintln!("[info] Repo: {}", ws.layout.root().display());
    eprintln!(
        "[info] {} {} serial={} threads={} environment={}",
        args.architecture,
        args.build_mode,
        args.serial,
        args.threads,
        args.environment.map_or("per project", |env| env.as_str()),
    );

    let report = Driver::new(&ws.registry, &ws.layout, runner).build(args)?;
    Ok(summarize(&report))
}

fn summarize(report: &BuildReport) -> Exit {
    for project in &report.skipped {
        eprintln!("[skip] {project}: no targets");
    }
    for failure in &report.failures {
        eprintln!("[fail] {} ({}): {}", failure.project, failure.phase, failure.error);
    }
    match report.outcome() {
        BuildOutcome::Success => {
            eprintln!("[ok] built {} project(s)", report.built.len());
            Exit::Success
        }
        BuildOutcome::Failure => {
            eprintln!("[fail] Failed to build project");
            Exit::TargetError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{Phase, ProjectFailure};
    use crate::process::RunError;
    use std::io;

    #[test]
    fn test_summary_exit_codes() {
        let mut report = BuildReport {
            built: vec!["kernel".into()],
            ..BuildReport::default()
        };
        assert_eq!(summarize(&report), Exit::Success);

        report.failures.push(ProjectFailure {
            project: "efi".into(),
            phase: Phase::Build,
            error: RunError::Spawn {
                program: "cmake".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        });
        assert_eq!(summarize(&report), Exit::TargetError);
    }
}
