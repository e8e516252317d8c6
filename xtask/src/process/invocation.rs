//! A fully formed external command, kept as discrete arguments until it is
//! handed to the OS.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    stdin: Option<PathBuf>,
    current_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    /// Feed the file at `path` to the child's standard input.
    pub fn stdin_from(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin = Some(path.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_stdin(&self) -> Option<&Path> {
        self.stdin.as_deref()
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    pub fn to_command(&self) -> io::Result<Command> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        if let Some(ref path) = self.stdin {
            cmd.stdin(Stdio::from(File::open(path)?));
        }
        Ok(cmd)
    }
}

fn needs_quoting(arg: &str) -> bool {
    arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | ';' | '$' | '\\' | '*' | '&' | '|'))
}

impl fmt::Display for Invocation {
    /// Shell-like rendering for logs. Never executed by a shell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if needs_quoting(arg) {
                write!(f, " '{}'", arg.replace('\'', r"'\''"))?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        if let Some(ref path) = self.stdin {
            write!(f, " < {}", path.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_only_when_needed() {
        let inv = Invocation::new("cmake")
            .args(["--build", "/tmp/build"])
            .arg("-DX=a;b")
            .arg("it's");
        assert_eq!(inv.to_string(), r"cmake --build /tmp/build '-DX=a;b' 'it'\''s'");
    }

    #[test]
    fn test_stdin_rendering_and_command() {
        let inv = Invocation::new("python3").arg("fix.py").stdin_from("/tmp/iwyu.txt");
        assert_eq!(inv.to_string(), "python3 fix.py < /tmp/iwyu.txt");
        assert_eq!(inv.get_stdin(), Some(Path::new("/tmp/iwyu.txt")));
    }

    #[test]
    fn test_to_command_keeps_args_discrete() {
        let inv = Invocation::new("echo").arg("a b").arg("c");
        let cmd = inv.to_command().unwrap();
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["a b", "c"]);
    }
}
