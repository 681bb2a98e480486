//! Timed execution of external commands
//!
//! Every external program the harness touches (aligners and the scorer) is
//! launched through [`run_timed`]. Execution is synchronous and unbounded: a
//! tool that never exits stalls the run.

use crate::BenchError;
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// A fully resolved command line
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Redirect standard output into this file instead of capturing it
    pub stdout: Option<PathBuf>,
}

impl Invocation {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdout: None,
        }
    }

    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdout_to<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.stdout = Some(path.into());
        self
    }

    /// Shell-like rendering for log lines
    pub fn display(&self) -> String {
        let mut rendered = self.program.display().to_string();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&arg.to_string_lossy());
        }
        if let Some(ref path) = self.stdout {
            rendered.push_str(" > ");
            rendered.push_str(&path.display().to_string());
        }
        rendered
    }
}

/// Run `invocation` to completion and return the wall-clock time it took.
///
/// Only a launch failure is an error. A non-zero exit status is logged and
/// the elapsed time is still returned; whether the tool produced something
/// usable is decided by whoever consumes its output.
pub fn run_timed(invocation: &Invocation) -> Result<Duration, BenchError> {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args).stdin(Stdio::null());

    if let Some(ref path) = invocation.stdout {
        let file = File::create(path).map_err(|e| {
            BenchError::ToolExecution(format!(
                "cannot create output file {}: {}",
                path.display(),
                e
            ))
        })?;
        cmd.stdout(Stdio::from(file));
    }

    debug!(command = %invocation.display(), "Launching");

    let start = Instant::now();
    let output = cmd.output().map_err(|e| {
        BenchError::ToolExecution(format!(
            "failed to launch {}: {}",
            invocation.program.display(),
            e
        ))
    })?;
    let elapsed = start.elapsed();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(
            program = %invocation.program.display(),
            exit_code = output.status.code().unwrap_or(-1),
            stderr = %stderr.trim(),
            "Command exited unsuccessfully"
        );
    }
    if !output.stdout.is_empty() {
        trace!(stdout = %String::from_utf8_lossy(&output.stdout), "Captured output");
    }

    debug!(
        program = %invocation.program.display(),
        seconds = elapsed.as_secs_f64(),
        "Finished"
    );
    Ok(elapsed)
}

/// True if `path` exists and holds at least one byte
pub fn produced_output(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}
