use std::fs;

use counter_dapp::devnet::Devnet;

use super::config::Project;
use crate::error::{CliError, Result};

pub fn load(project: &Project) -> Result<Devnet> {
    if !project.state_path.is_file() {
        return Err(CliError::Message(format!(
            "missing devnet state at {}",
            project.state_path.display()
        )));
    }

    let content = fs::read_to_string(&project.state_path)?;
    let devnet: Devnet = serde_json::from_str(&content)?;

    if devnet.deployment() != &project.config.deployment {
        return Err(CliError::DeploymentMismatch {
            path: project.state_path.clone(),
        });
    }

    Ok(devnet)
}

pub fn save(project: &Project, devnet: &Devnet) -> Result<()> {
    let content = serde_json::to_string_pretty(devnet)?;
    // Write next to the target first so a failed write never truncates it.
    let tmp = project.state_path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, &project.state_path)?;
    tracing::debug!(path = %project.state_path.display(), "devnet state saved");
    Ok(())
}
