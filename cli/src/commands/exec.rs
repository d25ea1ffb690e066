use counter_dapp::{
    controller::ActionController, read_model::CounterReadModel, CounterActionPolicy,
};

use crate::{
    cli::ExecArgs,
    error::Result,
    project::{config, state},
    ui,
};

pub fn run(args: ExecArgs) -> Result<()> {
    let project = config::load(&args.project.path)?;
    let mut devnet = state::load(&project)?;

    let mut model = CounterReadModel::new(Some(args.caller));
    model.refresh(&devnet);

    let request = args.action.request();
    let mut controller = ActionController::new(CounterActionPolicy::new(&project.config.deployment));
    let decision = controller.evaluate(&request, &model.context());

    ui::status(format!("{} as {}: {}", decision.label, args.caller, decision.plan));

    let receipt = controller.run(&mut devnet, &args.caller, &request, &model.context())?;
    state::save(&project, &devnet)?;

    ui::success(format!(
        "{} settled in block {} ({} call(s)), counter is now {}",
        receipt.hash, receipt.block_number, receipt.calls, receipt.counter
    ));
    println!("{}", receipt.counter);

    Ok(())
}
