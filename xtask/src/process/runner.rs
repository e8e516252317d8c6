use super::Invocation;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::{ExitStatus, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to start `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` failed with {status}")]
    Failed { program: String, status: ExitStatus },
    #[error("failed to stream output of `{program}`")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    pub fn program(&self) -> &str {
        match self {
            Self::Spawn { program, .. } | Self::Failed { program, .. } | Self::Io { program, .. } => {
                program
            }
        }
    }
}

/// Runs external tools one at a time.
///
/// Standard output goes to the log. Standard error goes to the log and to
/// every extra sink. A non-zero exit is reported as [`RunError::Failed`];
/// what happens next is the caller's decision.
pub trait ProcessRunner {
    fn run(&mut self, invocation: &Invocation, sinks: &mut [&mut dyn Write]) -> Result<(), RunError>;
}

/// Spawns real processes and blocks until they exit. There is no timeout.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation, sinks: &mut [&mut dyn Write]) -> Result<(), RunError> {
        let program = invocation.program();
        tracing::info!("{invocation}");

        let spawn_err = |source| RunError::Spawn {
            program: program.to_string(),
            source,
        };
        let io_err = |source| RunError::Io {
            program: program.to_string(),
            source,
        };

        let mut cmd = invocation.to_command().map_err(spawn_err)?;
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        let mut child = cmd.spawn().map_err(spawn_err)?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let streamed = std::thread::scope(|scope| {
            let out = scope.spawn(move || match stdout {
                Some(stdout) => forward_lines(stdout, |line| {
                    tracing::info!(target: "tool_output", %program, "{}", String::from_utf8_lossy(line));
                    Ok(())
                }),
                None => Ok(()),
            });

            let err = match stderr {
                Some(stderr) => forward_lines(stderr, |line| {
                    tracing::warn!(target: "tool_output", %program, "{}", String::from_utf8_lossy(line));
                    for sink in sinks.iter_mut() {
                        sink.write_all(line)?;
                        sink.write_all(b"\n")?;
                    }
                    Ok(())
                }),
                None => Ok(()),
            };

            let out = out
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdout reader panicked")));
            err.and(out)
        });

        let status = child.wait().map_err(io_err)?;
        streamed.map_err(io_err)?;
        for sink in sinks.iter_mut() {
            sink.flush().map_err(io_err)?;
        }

        if !status.success() {
            return Err(RunError::Failed {
                program: program.to_string(),
                status,
            });
        }
        Ok(())
    }
}

fn forward_lines<R: Read>(
    reader: R,
    mut on_line: impl FnMut(&[u8]) -> io::Result<()>,
) -> io::Result<()> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        on_line(line)?;
    }
}


#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_is_teed_into_sinks() {
        let inv = Invocation::new("sh").args(["-c", "echo out; echo err1 >&2; echo err2 >&2"]);
        let mut captured = Vec::new();
        SystemRunner.run(&inv, &mut [&mut captured]).unwrap();
        assert_eq!(String::from_utf8(captured).unwrap(), "err1\nerr2\n");
    }

    #[test]
    fn test_non_zero_exit_is_reported() {
        let inv = Invocation::new("sh").args(["-c", "exit 3"]);
        let err = SystemRunner.run(&inv, &mut []).unwrap_err();
        assert!(
            matches!(&err, RunError::Failed { status, .. } if status.code() == Some(3)),
            "{err}"
        );
        assert_eq!(err.program(), "sh");
    }

    #[test]
    fn test_missing_program_is_a_spawn_error() {
        let inv = Invocation::new("definitely-not-a-real-flos-tool");
        let err = SystemRunner.run(&inv, &mut []).unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
        assert_eq!(err.program(), "definitely-not-a-real-flos-tool");
    }

    #[test]
    fn test_stdin_redirect() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.txt");
        std::fs::write(&input, "hello\n").unwrap();
        let inv = Invocation::new("sh").args(["-c", "cat >&2"]).stdin_from(&input);
        let mut captured = Vec::new();
        SystemRunner.run(&inv, &mut [&mut captured]).unwrap();
        assert_eq!(captured, b"hello\n");
    }
}
