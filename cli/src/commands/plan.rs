use counter_dapp::{read_model::CounterReadModel, CounterActionPolicy};

use crate::{
    cli::PlanArgs,
    error::Result,
    project::{config, state},
    ui,
};

pub fn run(args: PlanArgs) -> Result<()> {
    let project = config::load(&args.project.path)?;
    let devnet = state::load(&project)?;

    let mut model = CounterReadModel::new(args.caller.caller);
    model.refresh(&devnet);

    let mut ctx = model.context();
    if let Some(counter) = args.counter {
        ctx.counter = counter;
    }
    if let Some(owner) = args.owner {
        ctx.owner = Some(owner);
    }
    if let Some(balance) = args.balance {
        ctx.balance = Some(balance);
    }
    tracing::debug!(?ctx, "evaluating plan");

    let policy = CounterActionPolicy::new(&project.config.deployment);
    let decision = policy.decide(&args.action.request(), &ctx);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        ui::print_decision(&decision);
    }

    Ok(())
}
