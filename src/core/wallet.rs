//! Autonomous database wallet handling.
//!
//! SQLcl's `set cloudconfig` cannot be relied on, so the wallet archive is
//! unpacked next to itself and its `sqlnet.ora` is pointed at that directory.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::utils::io;

pub const SQLNET_ORA: &str = "sqlnet.ora";

/// Directory reference shipped in every downloaded wallet.
pub const WALLET_DIRECTORY_PLACEHOLDER: &str = r#"DIRECTORY="?/network/admin""#;

/// Directory the wallet is extracted into: the archive's absolute parent.
///
/// Absolutised lexically against the current directory; symlinks are kept.
pub fn wallet_dir(wallet: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(wallet).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("resolve {}", wallet.display())),
        )
    })?;

    absolute
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            Error::validation_invalid_argument(
                "dbWallet",
                format!("{} has no parent directory", wallet.display()),
            )
        })
}

/// Replace the wallet placeholder directory with `dir`.
pub fn patch_sqlnet(contents: &str, dir: &Path) -> String {
    contents.replace(
        WALLET_DIRECTORY_PLACEHOLDER,
        &format!(r#"DIRECTORY="{}""#, dir.display()),
    )
}

/// Extract `wallet` beside itself and patch its `sqlnet.ora`.
///
/// Returns the directory to use as `TNS_ADMIN`. Existing files with the same
/// names are overwritten.
pub fn install(wallet: &Path) -> Result<PathBuf> {
    if !wallet.is_file() {
        return Err(Error::wallet_not_found(wallet.display().to_string()));
    }

    let dir = wallet_dir(wallet)?;
    info!("Extracting wallet {} into {}", wallet.display(), dir.display());

    let file = File::open(wallet).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("open {}", wallet.display())))
    })?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| Error::wallet_invalid_archive(wallet.display().to_string(), e.to_string()))?;
    archive
        .extract(&dir)
        .map_err(|e| Error::wallet_invalid_archive(wallet.display().to_string(), e.to_string()))?;

    let sqlnet = dir.join(SQLNET_ORA);
    if !sqlnet.is_file() {
        return Err(Error::wallet_sqlnet_missing(sqlnet.display().to_string()));
    }

    let contents = io::read_file(&sqlnet, "read sqlnet.ora")?;
    let patched = patch_sqlnet(&contents, &dir);
    if patched != contents {
        io::write_file(&sqlnet, &patched, "write sqlnet.ora")?;
        debug!("Patched {} to reference {}", sqlnet.display(), dir.display());
    }

    Ok(dir)
}
