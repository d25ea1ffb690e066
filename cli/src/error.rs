use std::path::PathBuf;

use counter_dapp::chain::ChainError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Message(String),

    #[error("path already exists: {0} (pass --force to overwrite)")]
    PathAlreadyExists(PathBuf),

    #[error("expected a counter-dapp project at {0} (run `counter-dapp init` first)")]
    NotAProject(PathBuf),

    #[error("invalid funding entry '{entry}': expected ADDRESS=AMOUNT")]
    InvalidFunding { entry: String },

    #[error("devnet state at {path} belongs to a different deployment")]
    DeploymentMismatch { path: PathBuf },

    #[error(transparent)]
    Dapp(#[from] counter_dapp::Error),

    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
