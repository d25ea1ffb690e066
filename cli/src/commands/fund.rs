use crate::{
    cli::FundArgs,
    error::Result,
    project::{config, state},
    ui,
};

pub fn run(args: FundArgs) -> Result<()> {
    let project = config::load(&args.project.path)?;
    let mut devnet = state::load(&project)?;

    let balance = devnet.mint(args.account, args.amount)?;
    state::save(&project, &devnet)?;

    ui::success(format!(
        "{} now holds {balance} {}",
        args.account, project.config.deployment.token_symbol
    ));
    Ok(())
}
