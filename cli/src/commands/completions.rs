use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::generate;

use crate::{
    cli::{Cli, CompletionsArgs},
    error::Result,
};

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_bin_name().unwrap_or("counter-dapp").to_string();
    let mut out = io::stdout().lock();
    generate(args.shell, &mut cmd, bin, &mut out);
    out.flush()?;
    Ok(())
}
