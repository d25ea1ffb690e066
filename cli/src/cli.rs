use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use counter_dapp::{ActionRequest, Address, TokenAmount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    /// Increase the counter by one.
    Increase,
    /// Decrease the counter by one.
    Decrease,
    /// Reset the counter to zero.
    Reset,
    /// Set the counter to VALUE (owner only).
    Set,
}

#[derive(Debug, Parser)]
#[command(name = "counter-dapp")]
#[command(bin_name = "counter-dapp")]
#[command(about = "Inspect and drive the CounterContract from the terminal")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a project config and a fresh devnet.
    Init(InitArgs),
    /// Show the counter and what the caller may do with it.
    Status(StatusArgs),
    /// Show the call plan for one action without submitting it.
    Plan(PlanArgs),
    /// Submit one action to the devnet.
    Exec(ExecArgs),
    /// List counter change events.
    Events(EventsArgs),
    /// Credit payment tokens to an account on the devnet.
    Fund(FundArgs),
    /// Generate shell completion scripts.
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ProjectOptions {
    /// Path to the project directory.
    #[arg(long, default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory in which the project files are written.
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Owner of the counter contract.
    #[arg(long)]
    pub owner: Address,

    /// Address of the counter contract.
    #[arg(long, default_value = "0x0c0ffee")]
    pub counter_address: Address,

    /// Address of the payment token.
    #[arg(long, default_value = "0x04718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d")]
    pub token_address: Address,

    /// Initial counter value.
    #[arg(long, default_value_t = 0)]
    pub counter: u64,

    /// Initial balances, as ADDRESS=AMOUNT. Repeatable.
    #[arg(long = "fund", value_name = "ADDRESS=AMOUNT")]
    pub funds: Vec<String>,

    /// Overwrite existing project files.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct CallerOptions {
    /// Connected account. Omit to act as a disconnected wallet.
    #[arg(long)]
    pub caller: Option<Address>,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub project: ProjectOptions,

    #[command(flatten)]
    pub caller: CallerOptions,

    /// Text of the set field to evaluate.
    #[arg(long, default_value = "")]
    pub set_value: String,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ActionOptions {
    /// Action to evaluate.
    #[arg(value_enum)]
    pub action: ActionArg,

    /// New counter value for `set`.
    #[arg(allow_hyphen_values = true)]
    pub value: Option<String>,
}

impl ActionOptions {
    pub fn request(&self) -> ActionRequest {
        match self.action {
            ActionArg::Increase => ActionRequest::Increase,
            ActionArg::Decrease => ActionRequest::Decrease,
            ActionArg::Reset => ActionRequest::Reset,
            ActionArg::Set => ActionRequest::set_to(self.value.clone().unwrap_or_default()),
        }
    }
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub project: ProjectOptions,

    #[command(flatten)]
    pub caller: CallerOptions,

    #[command(flatten)]
    pub action: ActionOptions,

    /// Evaluate against this counter value instead of the chain's.
    #[arg(long)]
    pub counter: Option<u64>,

    /// Evaluate against this owner instead of the chain's.
    #[arg(long)]
    pub owner: Option<Address>,

    /// Evaluate against this caller balance instead of the chain's.
    #[arg(long)]
    pub balance: Option<TokenAmount>,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ExecArgs {
    #[command(flatten)]
    pub project: ProjectOptions,

    /// Account signing the transaction.
    #[arg(long)]
    pub caller: Address,

    #[command(flatten)]
    pub action: ActionOptions,
}

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(flatten)]
    pub project: ProjectOptions,

    /// First block to include.
    #[arg(long, default_value_t = 0)]
    pub from_block: u64,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct FundArgs {
    #[command(flatten)]
    pub project: ProjectOptions,

    /// Account to credit.
    pub account: Address,

    /// Amount in whole tokens, fractions allowed.
    pub amount: TokenAmount,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}
