use std::path::PathBuf;

use clap::Args;
use tracing::{debug, error};

use lbcicd::config;
use lbcicd::credentials::{self, CredentialSources};
use lbcicd::logging::{self, LogConfig};
use lbcicd::pipeline::{Action, Pipeline, PipelineReport};
use lbcicd::sqlcl::Sqlcl;

pub type CmdResult<T> = lbcicd::Result<T>;

/// Environment variable naming the network configuration directory.
const TNS_ADMIN_ENV: &str = "TNS_ADMIN";

/// Connection arguments shared by every action.
#[derive(Args, Clone)]
pub struct DbArgs {
    /// Database Name
    #[arg(long = "dbName")]
    pub db_name: String,

    /// Schema User
    #[arg(long = "dbUser")]
    pub db_user: String,

    /// ADMIN Password (falls back to the secret file)
    #[arg(long = "dbPass")]
    pub db_pass: Option<String>,

    /// Database Wallet
    #[arg(long = "dbWallet")]
    pub db_wallet: Option<String>,

    /// Enable Debug
    #[arg(long)]
    pub debug: bool,

    /// Directory holding the admin/schema/data/apex changelog folders
    #[arg(long, default_value = ".")]
    pub root: String,

    /// Configuration file (defaults to lbcicd.json in --root when present)
    #[arg(long)]
    pub config: Option<String>,
}

impl std::fmt::Debug for DbArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbArgs")
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_pass", &self.db_pass.as_ref().map(|_| "********"))
            .field("db_wallet", &self.db_wallet)
            .field("debug", &self.debug)
            .field("root", &self.root)
            .field("config", &self.config)
            .finish()
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

fn require_value(field: &str, value: &str) -> CmdResult<()> {
    if value.trim().is_empty() {
        return Err(lbcicd::Error::validation_invalid_argument(
            field,
            format!("--{} must not be empty", field),
        ));
    }
    Ok(())
}

/// Resolve configuration and credentials, then run `action` to completion.
///
/// Logging is scoped to this call and built from the loaded configuration.
pub(crate) fn execute(action: Action, args: &DbArgs) -> CmdResult<PipelineReport> {
    let root = expand_path(&args.root);
    let explicit_config = args.config.as_deref().map(expand_path);

    let config = match config::load(&root, explicit_config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            logging::with_logging(&LogConfig::default().with_debug(args.debug), || {
                error!("{}", err.message)
            });
            return Err(err);
        }
    };

    let log_config = config.log.clone().with_debug(args.debug);
    logging::with_logging(&log_config, || {
        if args.debug {
            debug!("Debugging Enabled");
        }
        debug!("Arguments: {:?}", args);

        let result = run_pipeline(action, args, &root, &config);
        if let Err(err) = &result {
            error!("{} ({})", err.message, err.code.as_str());
        }
        result
    })
}

/// `read_env` is consulted for `TNS_ADMIN` only when no wallet was given.
fn credential_sources<F>(
    args: &DbArgs,
    root: &std::path::Path,
    config: &config::CicdConfig,
    read_env: F,
) -> CredentialSources
where
    F: FnOnce(&str) -> Option<String>,
{
    let wallet = args.db_wallet.as_deref().map(expand_path);
    let tns_admin_env = match wallet {
        Some(_) => None,
        None => read_env(TNS_ADMIN_ENV),
    };

    CredentialSources {
        password: args.db_pass.clone(),
        secret_file: root.join(&config.secret_file),
        wallet,
        tns_admin_env,
    }
}

fn run_pipeline(
    action: Action,
    args: &DbArgs,
    root: &std::path::Path,
    config: &config::CicdConfig,
) -> CmdResult<PipelineReport> {
    require_value("dbName", &args.db_name)?;
    require_value("dbUser", &args.db_user)?;

    let sources = credential_sources(args, root, config, |name| std::env::var(name).ok());
    let credentials = credentials::resolve(&sources)?;

    let runner = Sqlcl::new(config, &args.db_name, &credentials, root);
    Pipeline::new(&runner, config, root, &args.db_user).run(action)
}

pub mod deploy;
pub mod destroy;
pub mod generate;

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> DbArgs {
        DbArgs {
            db_name: "demo".to_string(),
            db_user: "APP".to_string(),
            db_pass: Some("Sup3r#Secret".to_string()),
            db_wallet: None,
            debug: false,
            root: ".".to_string(),
            config: None,
        }
    }

    #[test]
    fn debug_output_masks_password() {
        let rendered = format!("{:?}", args());
        assert!(!rendered.contains("Sup3r#Secret"));
        assert!(rendered.contains("********"));
    }

    #[test]
    fn blank_db_user_rejected() {
        let err = require_value("dbUser", "  ").unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn wallet_skips_tns_admin_lookup() {
        let args = DbArgs {
            db_wallet: Some("/tmp/wallet.zip".to_string()),
            ..args()
        };
        let config = config::CicdConfig::default();

        let sources = credential_sources(&args, std::path::Path::new("/work"), &config, |_| {
            panic!("TNS_ADMIN must not be read when --dbWallet is given")
        });

        assert_eq!(sources.wallet, Some(PathBuf::from("/tmp/wallet.zip")));
        assert!(sources.tns_admin_env.is_none());
        assert_eq!(sources.secret_file, PathBuf::from("/work/.secret"));
    }

    #[test]
    fn no_wallet_reads_tns_admin() {
        let config = config::CicdConfig::default();
        let mut asked = None;

        let sources = credential_sources(&args(), std::path::Path::new("/work"), &config, |name| {
            asked = Some(name.to_string());
            Some("/opt/oracle/network/admin".to_string())
        });

        assert_eq!(asked.as_deref(), Some("TNS_ADMIN"));
        assert!(sources.wallet.is_none());
        assert_eq!(
            sources.tns_admin_env.as_deref(),
            Some("/opt/oracle/network/admin")
        );
    }

    #[test]
    fn invalid_config_fails_before_any_run() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("lbcicd.json"), "{broken").unwrap();
        let args = DbArgs {
            root: temp.path().display().to_string(),
            ..args()
        };
        let err = execute(Action::Deploy, &args).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn missing_secret_fails_before_any_run() {
        let temp = tempfile::TempDir::new().unwrap();
        let args = DbArgs {
            db_pass: None,
            root: temp.path().display().to_string(),
            ..args()
        };
        let err = execute(Action::Destroy, &args).unwrap_err();
        assert_eq!(err.code.as_str(), "secret.file_not_found");
    }
}
