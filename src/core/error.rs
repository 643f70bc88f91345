use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationInvalidArgument,

    SecretFileNotFound,
    SecretFileMalformed,

    EnvTnsAdminUnset,
    EnvTnsNamesMissing,

    WalletNotFound,
    WalletInvalidArchive,
    WalletSqlnetMissing,

    SqlclLaunchFailed,
    SqlclCommandFailed,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::SecretFileNotFound => "secret.file_not_found",
            ErrorCode::SecretFileMalformed => "secret.file_malformed",

            ErrorCode::EnvTnsAdminUnset => "env.tns_admin_unset",
            ErrorCode::EnvTnsNamesMissing => "env.tnsnames_missing",

            ErrorCode::WalletNotFound => "wallet.not_found",
            ErrorCode::WalletInvalidArchive => "wallet.invalid_archive",
            ErrorCode::WalletSqlnetMissing => "wallet.sqlnet_missing",

            ErrorCode::SqlclLaunchFailed => "sqlcl.launch_failed",
            ErrorCode::SqlclCommandFailed => "sqlcl.command_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDetails {
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletInvalidArchiveDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlclLaunchFailedDetails {
    pub program: String,
    pub working_dir: String,
    pub error: String,
}

/// Failure of a single SQLcl run. Never carries the password.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlclCommandFailedDetails {
    pub area: String,
    pub role: String,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub error_lines: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn secret_file_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        let details = to_details(PathDetails { path: path.clone() });

        Self::new(
            ErrorCode::SecretFileNotFound,
            "Database password required",
            details,
        )
        .with_hint("Pass --dbPass or create the secret file")
        .with_hint(format!("Expected secret file at {}", path))
    }

    pub fn secret_file_malformed(path: impl Into<String>) -> Self {
        let details = to_details(PathDetails { path: path.into() });

        Self::new(
            ErrorCode::SecretFileMalformed,
            "Secret file contains no password",
            details,
        )
    }

    pub fn env_tns_admin_unset() -> Self {
        Self::new(
            ErrorCode::EnvTnsAdminUnset,
            "Wallet not specified and TNS_ADMIN not set, unable to proceed with DB resolution",
            Value::Object(serde_json::Map::new()),
        )
        .with_hint("Pass --dbWallet or export TNS_ADMIN")
    }

    pub fn env_tnsnames_missing(path: impl Into<String>) -> Self {
        let path = path.into();
        let details = to_details(PathDetails { path: path.clone() });

        Self::new(
            ErrorCode::EnvTnsNamesMissing,
            format!(
                "{} not found, unable to proceed with DB resolution",
                path
            ),
            details,
        )
    }

    pub fn wallet_not_found(path: impl Into<String>) -> Self {
        let details = to_details(PathDetails { path: path.into() });

        Self::new(ErrorCode::WalletNotFound, "Wallet archive not found", details)
    }

    pub fn wallet_invalid_archive(path: impl Into<String>, error: impl Into<String>) -> Self {
        let details = to_details(WalletInvalidArchiveDetails {
            path: path.into(),
            error: error.into(),
        });

        Self::new(
            ErrorCode::WalletInvalidArchive,
            "Wallet is not a readable zip archive",
            details,
        )
    }

    pub fn wallet_sqlnet_missing(path: impl Into<String>) -> Self {
        let details = to_details(PathDetails { path: path.into() });

        Self::new(
            ErrorCode::WalletSqlnetMissing,
            "Wallet did not contain sqlnet.ora",
            details,
        )
    }

    pub fn sqlcl_launch_failed(details: SqlclLaunchFailedDetails) -> Self {
        let program = details.program.clone();
        Self::new(
            ErrorCode::SqlclLaunchFailed,
            format!("Failed to launch {}", program),
            to_details(details),
        )
        .with_hint(format!("Ensure '{}' is on PATH or set sqlBinary in lbcicd.json", program))
    }

    pub fn sqlcl_command_failed(details: SqlclCommandFailedDetails) -> Self {
        let message = format!("SQLcl command failed in {} as {}", details.area, details.role);
        Self::new(ErrorCode::SqlclCommandFailed, message, to_details(details))
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
