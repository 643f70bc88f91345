//! CLI response formatting and output.
//!
//! Provides JSON envelope, printing, and exit code mapping.

use lbcicd::error::Hint;
use lbcicd::{Error, ErrorCode, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    use std::io::{self, Write};

    let payload = response.to_json()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

/// Print the envelope for `result` and return the process exit code.
pub fn print_result<T: Serialize>(result: &Result<T>) -> i32 {
    let printed = match result {
        Ok(data) => print_response(&CliResponse::success(data)),
        Err(err) => print_response(&CliResponse::<()>::from_error(err)),
    };

    match (result, printed) {
        (Err(err), _) => exit_code_for_error(err.code),
        (Ok(_), Err(err)) => exit_code_for_error(err.code),
        (Ok(_), Ok(())) => 0,
    }
}

/// Every fatal condition ends the run with status 1.
pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ValidationInvalidArgument
        | ErrorCode::SecretFileNotFound
        | ErrorCode::SecretFileMalformed
        | ErrorCode::EnvTnsAdminUnset
        | ErrorCode::EnvTnsNamesMissing
        | ErrorCode::WalletNotFound
        | ErrorCode::WalletInvalidArchive
        | ErrorCode::WalletSqlnetMissing
        | ErrorCode::SqlclLaunchFailed
        | ErrorCode::SqlclCommandFailed
        | ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lbcicd::error::SqlclCommandFailedDetails;

    #[test]
    fn error_envelope_carries_code_and_details() {
        let err = Error::sqlcl_command_failed(SqlclCommandFailedDetails {
            area: "admin".to_string(),
            role: "ADMIN".to_string(),
            command: "lb rollback-count -changelog controller.xml -count 999;".to_string(),
            exit_code: Some(1),
            error_lines: vec!["SQL Error: ORA-00942".to_string()],
        });

        let json = CliResponse::<()>::from_error(&err).to_json().unwrap();

        assert!(json.contains("\"success\": false"));
        assert!(json.contains("\"code\": \"sqlcl.command_failed\""));
        assert!(json.contains("SQL Error: ORA-00942"));
        assert!(!json.contains("\"hints\""));
    }

    #[test]
    fn success_envelope_wraps_data() {
        let json = CliResponse::success(serde_json::json!({"steps": 1}))
            .to_json()
            .unwrap();
        assert!(json.contains("\"success\": true"));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn configuration_failures_exit_with_one() {
        assert_eq!(exit_code_for_error(ErrorCode::SecretFileNotFound), 1);
        assert_eq!(exit_code_for_error(ErrorCode::EnvTnsAdminUnset), 1);
        assert_eq!(exit_code_for_error(ErrorCode::SqlclCommandFailed), 1);
    }
}
