mod command;
mod config;

use std::{borrow::Cow, env, fs::File, io::BufReader, process};

use command::{Command, Invocation};
use config::AppConfig;
use splitledger_application::LedgerService;
use splitledger_infrastructure::{InMemoryExpenseStore, InMemoryGroupRoster, LedgerSnapshot};

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    config::init_logging();

    let invocation = Invocation::parse(env::args().skip(1))?;
    let config = AppConfig::from_env()?;

    let path = &invocation.snapshot_path;
    let file = File::open(path).map_err(|err| format!("Failed to read '{path}': {err}"))?;
    let snapshot = LedgerSnapshot::from_reader(BufReader::new(file))
        .map_err(|err| format!("Failed to load '{path}': {err}"))?;

    let store = InMemoryExpenseStore::new();
    let roster = InMemoryGroupRoster::new();
    let recorded = snapshot
        .load_into(&store, &roster)
        .map_err(|err| format!("Failed to load '{path}': {err}"))?;
    tracing::info!(path = %path, recorded, "Snapshot loaded");

    let service = LedgerService::with_config(&store, &roster, config.ledger);
    let output = execute(&service, &invocation.command)?;
    print!("{output}");
    Ok(())
}

fn execute(service: &LedgerService<'_>, command: &Command) -> CliResult<String> {
    let output = match command {
        Command::Group(group) => {
            let summary = service.group_summary(group).map_err(to_message)?;
            command::format_group_summary(&summary)
        }
        Command::Pair { user, friend } => {
            let balance = service
                .pairwise_balance(user, friend)
                .map_err(to_message)?;
            let mut line = command::format_pair(user, friend, balance);
            line.push('\n');
            line
        }
        Command::User(user) => {
            let balances = service.counterpart_balances(user).map_err(to_message)?;
            command::format_counterparts(user, &balances)
        }
    };
    Ok(output)
}

fn to_message(err: impl std::fmt::Display) -> Cow<'static, str> {
    err.to_string().into()
}
