//! External command execution for git, gh and helm
//!
//! This module provides:
//! - A thin wrapper around `std::process::Command` with buffered output
//! - Detection of missing binaries
//! - Redaction of secrets from logged command lines and error output

use crate::error::ToolError;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Command, Output};

const REDACTED: &str = "***";

/// An external program invoked synchronously
#[derive(Debug, Clone)]
pub struct Tool {
    program: String,
    working_dir: Option<PathBuf>,
    secrets: Vec<String>,
}

impl Tool {
    /// Create a tool for `program`, resolved through PATH
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            working_dir: None,
            secrets: Vec::new(),
        }
    }

    /// Run commands inside `dir` (builder pattern)
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Register a value that must never appear in logs or errors
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        if !secret.is_empty() {
            self.secrets.push(secret);
        }
        self
    }

    /// Fail with `ToolMissing` unless `program <check_args...>` can be spawned and succeeds
    pub fn ensure_installed(&self, check_args: &[&str]) -> Result<(), ToolError> {
        match self.output(check_args) {
            Ok(output) if output.status.success() => Ok(()),
            Ok(_) => Err(ToolError::ToolMissing {
                tool: self.program.clone(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Run with `args` and return trimmed stdout, or `CommandFailed` with stderr
    pub fn run(&self, args: &[&str]) -> Result<String, ToolError> {
        let output = self.output(args)?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if output.status.success() {
            Ok(stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() { stdout } else { stderr };
            Err(ToolError::command_failed(
                self.redact(&self.command_line(args)),
                self.redact(&detail),
            ))
        }
    }

    fn output(&self, args: &[&str]) -> Result<Output, ToolError> {
        let command_line = self.command_line(args);
        tracing::debug!(command = %self.redact(&command_line), "running");

        let mut command = Command::new(&self.program);
        command.args(args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => ToolError::ToolMissing {
                tool: self.program.clone(),
            },
            _ => ToolError::command_failed(
                self.redact(&command_line),
                format!("failed to execute command: {}", e),
            ),
        })
    }

    fn command_line(&self, args: &[&str]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn redact(&self, text: &str) -> String {
        redact(text, &self.secrets)
    }
}

/// Replace every occurrence of each secret in `text`
pub fn redact(text: &str, secrets: &[String]) -> String {
    secrets
        .iter()
        .filter(|s| !s.is_empty())
        .fold(text.to_string(), |acc, secret| acc.replace(secret.as_str(), REDACTED))
}
