//! External command execution.
//!
//! Every step of the bootstrap is an [`Invocation`] handed to a [`Runner`].
//! [`SystemRunner`] spawns real processes; tests substitute a recording fake.

use crate::error::BootstrapError;
use anyhow::{Context, Result};
use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};

/// A single external command: program, arguments, and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
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

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        cmd
    }

    fn failed(&self, code: Option<i32>) -> BootstrapError {
        BootstrapError::CommandFailed {
            command: self.to_string(),
            code,
        }
    }
}

impl fmt::Display for Invocation {
    /// Shell-like rendering, used for plans and manual-run hints.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (k, v) in &self.env {
            write!(f, "{}{}={}", if first { "" } else { " " }, k, quote(v))?;
            first = false;
        }
        write!(f, "{}{}", if first { "" } else { " " }, quote(&self.program))?;
        for a in &self.args {
            write!(f, " {}", quote(a))?;
        }
        Ok(())
    }
}

fn quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+@,".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Process execution seam for the bootstrap pipeline.
pub trait Runner {
    /// Run with inherited stdio; a non-zero exit becomes
    /// [`BootstrapError::CommandFailed`] carrying the child's exit code.
    fn run(&self, inv: &Invocation) -> Result<()>;

    /// Run quietly and report whether it exited successfully.
    fn succeeds(&self, inv: &Invocation) -> bool;

    /// Run and return trimmed stdout.
    fn capture(&self, inv: &Invocation) -> Result<String>;

    /// Run as a filter: write `input` to stdin, return raw stdout.
    fn pipe(&self, inv: &Invocation, input: &[u8]) -> Result<Vec<u8>>;

    /// Whether `program` resolves to an executable on PATH.
    fn resolves(&self, program: &str) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, inv: &Invocation) -> Result<()> {
        let status = inv
            .to_command()
            .status()
            .with_context(|| format!("run {}", inv.program))?;
        if status.success() {
            return Ok(());
        }
        Err(inv.failed(status.code()).into())
    }

    fn succeeds(&self, inv: &Invocation) -> bool {
        inv.to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn capture(&self, inv: &Invocation) -> Result<String> {
        let output = inv
            .to_command()
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("run {}", inv.program))?;
        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }
        let err = anyhow::Error::from(inv.failed(output.status.code()));
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.trim().is_empty() {
            return Err(err);
        }
        Err(err.context(format!("{}: {}", inv.program, stderr.trim())))
    }

    fn pipe(&self, inv: &Invocation, input: &[u8]) -> Result<Vec<u8>> {
        let mut child = inv
            .to_command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn {}", inv.program))?;
        let stdin = child.stdin.take();

        // stdin is fed concurrently with the stdout drain and closed when done
        let (output, written) = std::thread::scope(|s| {
            let writer = s.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(input),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            (output, writer.join())
        });

        let output = output.with_context(|| format!("wait for {}", inv.program))?;
        if !output.status.success() {
            return Err(inv.failed(output.status.code()).into());
        }
        match written {
            Ok(res) => res.with_context(|| format!("write stdin of {}", inv.program))?,
            Err(_) => anyhow::bail!("stdin writer for {} panicked", inv.program),
        }
        Ok(output.stdout)
    }

    fn resolves(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
