use colored::Colorize;
use counter_dapp::policy::Decision;

pub fn status(message: impl AsRef<str>) {
    eprintln!("{} {}", "==>".blue().bold(), message.as_ref());
}

pub fn success(message: impl AsRef<str>) {
    eprintln!("{} {}", "ok".green().bold(), message.as_ref());
}

pub fn warn(message: impl AsRef<str>) {
    eprintln!("{} {}", "warn".yellow().bold(), message.as_ref());
}

pub fn error(message: impl AsRef<str>) {
    eprintln!("{} {}", "error".red().bold(), message.as_ref());
}

/// One stdout line per decision, followed by why it is disabled.
pub fn print_decision(decision: &Decision) {
    let state = if decision.enabled {
        "enabled".green()
    } else {
        "disabled".red()
    };

    println!(
        "{:<9} {:<8} {} [{}]",
        decision.action.to_string().bold(),
        state,
        decision.label,
        decision.plan
    );
    println!("          {}", decision.explanation);

    if let Some(blocker) = &decision.blocker {
        println!(
            "          {}",
            blocker.clone().into_error(decision.action).to_string().yellow()
        );
    }
}
