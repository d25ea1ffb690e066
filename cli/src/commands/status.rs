use counter_dapp::{
    read_model::{CounterReadModel, LoadState},
    CounterActionPolicy,
};
use serde_json::json;

use crate::{
    cli::StatusArgs,
    error::Result,
    project::{config, state},
    ui,
};

pub fn run(args: StatusArgs) -> Result<()> {
    let project = config::load(&args.project.path)?;
    let devnet = state::load(&project)?;
    let deployment = &project.config.deployment;

    let mut model = CounterReadModel::new(args.caller.caller);
    model.refresh(&devnet);

    let policy = CounterActionPolicy::new(deployment);
    let decisions = policy.decide_all(&args.set_value, &model.context());

    if args.json {
        let report = json!({
            "counter": model.counter(),
            "owner": model.owner(),
            "caller": model.caller(),
            "balance": model.balance(),
            "block_number": devnet.block_number(),
            "decisions": decisions,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    ui::status(format!("Devnet at {}", project.project_dir.display()));
    if let LoadState::Failed(reason) = model.state() {
        ui::warn(format!("could not read the counter: {reason}"));
    }

    println!("counter  {}", display_or(model.counter(), "unknown"));
    println!("owner    {}", display_or(model.owner(), "unknown"));
    match model.caller() {
        Some(caller) => {
            let balance = model.balance().map_or_else(
                || "unknown".to_string(),
                |balance| format!("{balance} {}", deployment.token_symbol),
            );
            println!("caller   {caller} (balance {balance})");
        }
        None => println!("caller   not connected"),
    }
    println!();

    for decision in &decisions {
        ui::print_decision(decision);
    }

    Ok(())
}

fn display_or<T: std::fmt::Display>(value: Option<T>, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_string(), |v| v.to_string())
}
