use std::{
    fs,
    path::{Path, PathBuf},
};

use counter_dapp::config::Deployment;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

pub const CONFIG_FILE: &str = "counter-dapp.toml";
pub const DEFAULT_STATE_FILE: &str = "devnet.json";

fn default_state() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_FILE)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevnetConfig {
    /// Snapshot file, relative to the project directory.
    #[serde(default = "default_state")]
    pub state: PathBuf,
}

impl Default for DevnetConfig {
    fn default() -> Self {
        Self {
            state: default_state(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub deployment: Deployment,
    #[serde(default)]
    pub devnet: DevnetConfig,
}

#[derive(Debug, Clone)]
pub struct Project {
    pub project_dir: PathBuf,
    pub config: ProjectConfig,
    pub state_path: PathBuf,
}

pub fn load(project_dir: &Path) -> Result<Project> {
    let config_path = project_dir.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Err(CliError::NotAProject(project_dir.to_path_buf()));
    }

    let project_dir = fs::canonicalize(project_dir)?;
    let content = fs::read_to_string(&config_path)?;
    let config = parse(&content)?;
    let state_path = project_dir.join(&config.devnet.state);

    tracing::debug!(
        config = %config_path.display(),
        state = %state_path.display(),
        "project loaded"
    );

    Ok(Project {
        project_dir,
        config,
        state_path,
    })
}

pub fn parse(content: &str) -> Result<ProjectConfig> {
    let config: ProjectConfig = toml::from_str(content)?;
    config.deployment.validate()?;
    Ok(config)
}

pub fn render(config: &ProjectConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config = parse(
            r#"
            [deployment]
            counter_address = "0xc0"
            token_address = "0x57"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.deployment.token_symbol, "STRK");
        assert_eq!(config.deployment.payment.to_string(), "1");
        assert_eq!(config.devnet.state, PathBuf::from("devnet.json"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = parse(
            r#"
            [deployment]
            counter_address = "0xc0"
            token_address = "0x57"
            colour = "blue"
            "#,
        )
        .expect_err("unknown key");
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn rejects_shared_contract_addresses() {
        let err = parse(
            r#"
            [deployment]
            counter_address = "0xc0"
            token_address = "192"
            "#,
        )
        .expect_err("same address");
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn rendered_config_parses_back() {
        let config = ProjectConfig {
            deployment: Deployment::new(1u64.into(), 2u64.into()),
            devnet: DevnetConfig::default(),
        };
        let rendered = render(&config).expect("render");
        assert_eq!(parse(&rendered).expect("parse"), config);
    }
}
