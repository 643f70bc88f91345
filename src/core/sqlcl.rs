//! Runs SQLcl as a subprocess and decides whether the run succeeded.
//!
//! The connect directive (with the password) is written to SQLcl's stdin so
//! the secret never appears in the process list or shell history. SQLcl does
//! not reliably exit nonzero on failure, so stdout is also scanned for known
//! error markers.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::area::Area;
use crate::config::CicdConfig;
use crate::credentials::Credentials;
use crate::error::{Error, Result, SqlclCommandFailedDetails, SqlclLaunchFailedDetails};
use crate::utils::command;

const PASSWORD_MASK: &str = "********";

/// One SQLcl run: who to connect as, where, and what to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    pub area: Area,
    pub role: String,
    pub command: String,
}

/// Non-blank stdout lines of a run and the subset that matched an error marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    pub lines: Vec<String>,
    pub error_lines: Vec<String>,
    pub exit_code: Option<i32>,
}

impl Transcript {
    /// Build a transcript from raw stdout, dropping blank lines.
    pub fn scan(stdout: &str, exit_code: Option<i32>, markers: &[String]) -> Self {
        let lines: Vec<String> = stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        let error_lines = lines
            .iter()
            .filter(|line| markers.iter().any(|m| line.contains(m.as_str())))
            .cloned()
            .collect();

        Self {
            lines,
            error_lines,
            exit_code,
        }
    }

    /// Zero exit status and no error marker anywhere in the output.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && self.error_lines.is_empty()
    }
}

/// Executes invocations. The pipeline only talks to SQLcl through this seam.
pub trait SqlRunner {
    fn run(&self, invocation: &Invocation) -> Result<Transcript>;
}

/// Script fed to `sql /nolog`: connect, then the caller's command.
pub fn connect_script(role: &str, password: &str, service: &str, command: &str) -> String {
    format!("conn {}/{}@{}\n{}\n", role, password, service, command)
}

/// The real SQLcl process runner.
pub struct Sqlcl {
    program: String,
    args: Vec<String>,
    service: String,
    password: String,
    tns_admin: PathBuf,
    root: PathBuf,
    error_markers: Vec<String>,
}

impl Sqlcl {
    pub fn new(config: &CicdConfig, db_name: &str, credentials: &Credentials, root: &Path) -> Self {
        Self {
            program: config.sql_binary.clone(),
            args: config.sql_args.clone(),
            service: format!("{}{}", db_name, config.service_suffix),
            password: credentials.password.clone(),
            tns_admin: credentials.tns_admin.clone(),
            root: root.to_path_buf(),
            error_markers: config.error_markers.clone(),
        }
    }

    /// Variables added to the child's environment for one run.
    fn child_env(&self) -> Vec<(String, String)> {
        vec![
            ("password".to_string(), self.password.clone()),
            (
                "TNS_ADMIN".to_string(),
                self.tns_admin.display().to_string(),
            ),
        ]
    }
}

impl SqlRunner for Sqlcl {
    fn run(&self, invocation: &Invocation) -> Result<Transcript> {
        let working_dir = invocation.area.dir(&self.root);
        debug!(
            "Running in {}: {}",
            working_dir.display(),
            connect_script(&invocation.role, PASSWORD_MASK, &self.service, &invocation.command)
        );

        let script = connect_script(
            &invocation.role,
            &self.password,
            &self.service,
            &invocation.command,
        );

        let output = command::run_with_input(
            &self.program,
            &self.args,
            &working_dir,
            &self.child_env(),
            &script,
        )
        .map_err(|e| {
            Error::sqlcl_launch_failed(SqlclLaunchFailedDetails {
                program: self.program.clone(),
                working_dir: working_dir.display().to_string(),
                error: e.to_string(),
            })
        })?;

        let transcript = Transcript::scan(&output.stdout, output.exit_code, &self.error_markers);
        for line in &transcript.lines {
            info!("{}", line);
        }
        let process_ok = output.success();
        for line in output.stderr.lines().filter(|l| !l.trim().is_empty()) {
            if process_ok {
                debug!("stderr: {}", line);
            } else {
                warn!("stderr: {}", line);
            }
        }
        if !process_ok {
            warn!("SQLcl exited with status {:?}", output.exit_code);
        }

        if !transcript.succeeded() {
            error!("Exiting...");
            return Err(Error::sqlcl_command_failed(SqlclCommandFailedDetails {
                area: invocation.area.to_string(),
                role: invocation.role.clone(),
                command: invocation.command.clone(),
                exit_code: transcript.exit_code,
                error_lines: transcript.error_lines.clone(),
            }));
        }

        info!("SQLcl command successful");
        Ok(transcript)
    }
}
