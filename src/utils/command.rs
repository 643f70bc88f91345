//! Command execution primitives.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use serde::Serialize;

/// Captured output from command execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CapturedOutput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run `program` in `dir`, writing `input` to its stdin and capturing stdout/stderr.
///
/// `env` is layered over the inherited environment of this process for the child
/// only. Nothing in the current process environment is modified.
pub fn run_with_input(
    program: &str,
    args: &[String],
    dir: &Path,
    env: &[(String, String)],
    input: &str,
) -> std::io::Result<CapturedOutput> {
    let mut child = Command::new(program)
        .args(args)
        .current_dir(dir)
        .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        // A child that exits without reading stdin closes the pipe early.
        if let Err(e) = stdin.write_all(input.as_bytes()) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e);
            }
        }
    }

    let output = child.wait_with_output()?;

    Ok(CapturedOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code(),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn run_with_input_feeds_stdin() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = run_with_input("cat", &[], dir.path(), &[], "hello\nworld\n").unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "hello\nworld\n");
    }

    #[test]
    fn run_with_input_applies_env_to_child_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let env = vec![("LBCICD_TEST_VAR".to_string(), "child-only".to_string())];
        let out = run_with_input(
            "sh",
            &["-c".to_string(), "printf %s \"$LBCICD_TEST_VAR\"".to_string()],
            dir.path(),
            &env,
            "",
        )
        .unwrap();

        assert_eq!(out.stdout, "child-only");
        assert!(std::env::var("LBCICD_TEST_VAR").is_err());
    }

    #[test]
    fn run_with_input_uses_working_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let out = run_with_input("cat", &["marker.txt".to_string()], dir.path(), &[], "").unwrap();
        assert_eq!(out.stdout, "here");
    }

    #[test]
    fn run_with_input_reports_exit_code() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = run_with_input(
            "sh",
            &["-c".to_string(), "exit 3".to_string()],
            dir.path(),
            &[],
            "",
        )
        .unwrap();
        assert_eq!(out.exit_code, Some(3));
        assert!(!out.success());
    }

    #[test]
    fn run_with_input_errors_for_missing_program() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(run_with_input("nonexistent_command_xyz", &[], dir.path(), &[], "").is_err());
    }
}
