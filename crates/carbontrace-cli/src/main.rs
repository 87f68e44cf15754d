//! carbontrace - Filter supply-chain products by ledger state and history.

use carbontrace_cli::commands;
use carbontrace_cli::repl;
use carbontrace_cli::{Cli, Command, Config, Formatter};
use carbontrace_store::SqliteLedger;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so they never mix with table output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> carbontrace_cli::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    // Profile management never touches the ledger
    let command = match cli.command {
        Some(Command::Profile(args)) => {
            return commands::execute_profile(args, &mut config, &formatter);
        }
        other => other,
    };

    let profile = config.get_active_profile()?.clone();
    let database = cli.database.unwrap_or_else(|| profile.database.clone());
    if let Some(parent) = database.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut ledger = SqliteLedger::new(&database)?;

    match command {
        None | Some(Command::Repl) => repl::run_repl(&config, &ledger, &formatter)?,
        Some(Command::Filter(args)) => commands::execute_filter(args, &ledger, &formatter)?,
        Some(Command::Show(args)) => commands::execute_show(args, &ledger, &formatter)?,
        Some(Command::Products(args)) => {
            commands::execute_products(args, &ledger, &profile, &formatter)?
        }
        Some(Command::Materials(args)) => commands::execute_materials(args, &ledger, &formatter)?,
        Some(Command::Import(args)) => commands::execute_import(args, &mut ledger, &formatter)?,
        Some(Command::Profile(_)) => unreachable!(),
    }

    Ok(())
}
