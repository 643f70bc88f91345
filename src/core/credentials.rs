//! Resolution of the database password and the `TNS_ADMIN` directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::utils::io;
use crate::wallet;

pub const TNSNAMES_ORA: &str = "tnsnames.ora";

/// Everything needed to reach the database, resolved before any SQLcl run.
#[derive(Clone)]
pub struct Credentials {
    pub password: String,
    pub tns_admin: PathBuf,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"********")
            .field("tns_admin", &self.tns_admin)
            .finish()
    }
}

/// Inputs to credential resolution. `tns_admin_env` is the value of the
/// `TNS_ADMIN` variable as read by the caller, if any.
#[derive(Clone, Default)]
pub struct CredentialSources {
    pub password: Option<String>,
    pub secret_file: PathBuf,
    pub wallet: Option<PathBuf>,
    pub tns_admin_env: Option<String>,
}

pub fn resolve(sources: &CredentialSources) -> Result<Credentials> {
    let password = resolve_password(sources.password.as_deref(), || {
        read_secret_file(&sources.secret_file)
    })?;

    let tns_admin = match &sources.wallet {
        Some(wallet) => wallet::install(wallet)?,
        None => resolve_tns_admin(sources.tns_admin_env.as_deref())?,
    };
    debug!("Using TNS_ADMIN {}", tns_admin.display());

    Ok(Credentials {
        password,
        tns_admin,
    })
}

/// Use the flag value when present, otherwise fall back to `read_secret`.
/// `read_secret` is not called when a flag value is given.
pub fn resolve_password<F>(flag: Option<&str>, read_secret: F) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    match flag.filter(|p| !p.is_empty()) {
        Some(password) => Ok(password.to_string()),
        None => read_secret(),
    }
}

/// The password is the first whitespace-delimited token of the last line.
/// Trailing blank lines are skipped.
pub fn read_secret_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::secret_file_not_found(path.display().to_string()));
    }

    let content = io::read_file(path, &format!("read {}", path.display()))?;
    let password = parse_secret(&content)
        .ok_or_else(|| Error::secret_file_malformed(path.display().to_string()))?;

    info!("Using password from {}", path.display());
    Ok(password)
}

fn parse_secret(content: &str) -> Option<String> {
    content
        .lines()
        .rev()
        .find_map(|line| line.split_whitespace().next())
        .map(str::to_string)
}

/// Validate a `TNS_ADMIN` value: it must be set and contain `tnsnames.ora`.
pub fn resolve_tns_admin(env_value: Option<&str>) -> Result<PathBuf> {
    let dir = env_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| PathBuf::from(shellexpand::tilde(v).into_owned()))
        .ok_or_else(Error::env_tns_admin_unset)?;

    let tnsnames = dir.join(TNSNAMES_ORA);
    if !tnsnames.is_file() {
        return Err(Error::env_tnsnames_missing(tnsnames.display().to_string()));
    }

    Ok(dir)
}
