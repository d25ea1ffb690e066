use std::{fs, path::Path};

use counter_dapp::{config::Deployment, devnet::Devnet, Address, TokenAmount};

use crate::{
    cli::InitArgs,
    error::{CliError, Result},
    project::{
        config::{self, DevnetConfig, Project, ProjectConfig, CONFIG_FILE},
        state,
    },
    ui,
};

pub fn run(args: InitArgs) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILE);
    if config_path.exists() && !args.force {
        return Err(CliError::PathAlreadyExists(config_path));
    }

    let funds = args
        .funds
        .iter()
        .map(|entry| parse_funding(entry))
        .collect::<Result<Vec<_>>>()?;

    let deployment = Deployment::new(args.counter_address, args.token_address);
    deployment.validate()?;

    let mut devnet = Devnet::new(deployment.clone(), args.owner).with_counter(args.counter);
    for (account, amount) in &funds {
        devnet.mint(*account, *amount)?;
    }

    ui::status(format!("Creating project at {}", args.path.display()));
    fs::create_dir_all(&args.path)?;

    let project_config = ProjectConfig {
        deployment,
        devnet: DevnetConfig::default(),
    };
    write_file(&config_path, &config::render(&project_config)?, args.force)?;

    let project = Project {
        state_path: args.path.join(&project_config.devnet.state),
        project_dir: args.path,
        config: project_config,
    };
    state::save(&project, &devnet)?;

    ui::success(format!(
        "Devnet ready: counter {} owned by {}",
        args.counter, args.owner
    ));
    for (account, amount) in &funds {
        println!(
            "  funded {account} with {amount} {}",
            project.config.deployment.token_symbol
        );
    }

    Ok(())
}

fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && overwrite {
        ui::warn(format!("Overwriting {}", path.display()));
    }
    fs::write(path, content)?;
    tracing::debug!(path = %path.display(), "wrote file");
    Ok(())
}

fn parse_funding(entry: &str) -> Result<(Address, TokenAmount)> {
    let invalid = || CliError::InvalidFunding {
        entry: entry.to_string(),
    };

    let (account, amount) = entry.split_once('=').ok_or_else(invalid)?;
    let account = account.trim().parse::<Address>()?;
    let amount = amount.trim().parse::<TokenAmount>()?;
    Ok((account, amount))
}
