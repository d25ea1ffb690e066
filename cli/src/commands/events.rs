use counter_dapp::{chain::EventHistory, events};

use crate::{
    cli::EventsArgs,
    error::Result,
    project::{config, state},
};

pub fn run(args: EventsArgs) -> Result<()> {
    let project = config::load(&args.project.path)?;
    let devnet = state::load(&project)?;

    let raw = devnet.counter_changed_events(args.from_block)?;
    let entries = events::history(&raw);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("no counter changes since block {}", args.from_block);
        return Ok(());
    }

    println!("{:<7} {:<9} {:>6} -> {:<6} caller", "block", "reason", "old", "new");
    for entry in &entries {
        println!(
            "{:<7} {:<9} {:>6} -> {:<6} {}",
            entry.block_number,
            entry.reason_label(),
            entry.old_value,
            entry.new_value,
            entry.caller
        );
    }

    Ok(())
}
