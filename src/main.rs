use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, Command};
use speaker_scheduler::{report, Config, Error};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn cli() -> Command {
    Command::new("speaker-scheduler")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Schedules seminar speakers using last year's order and weighted randomness")
        .arg(
            Arg::new("roster")
                .value_name("ROSTER")
                .help("CSV file containing \"first name,last name,year in program\"")
                .required_unless_present("write-config")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("last_year")
                .value_name("LAST_YEAR")
                .help("CSV file containing \"date,name(s)\" with co-presenters separated by '/'")
                .required_unless_present("write-config")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Scheduling policy file (built-in defaults when omitted)"),
        )
        .arg(
            Arg::new("write-config")
                .long("write-config")
                .value_name("FILE")
                .help("Write the default scheduling policy to FILE and exit"),
        )
        .arg(
            Arg::new("show-draws")
                .long("show-draws")
                .action(ArgAction::SetTrue)
                .help("Show the random value each week was sorted by"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log skipped lines and individual draws to stderr"),
        )
}

fn main() -> Result<()> {
    let mut cmd = cli();
    let matches = cmd.get_matches_mut();

    let default_filter = if matches.get_flag("verbose") {
        "speaker_scheduler=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = matches.get_one::<String>("write-config") {
        Config::default()
            .save_to_file(path)
            .with_context(|| format!("Failed to write configuration to {}", path))?;
        eprintln!("📝 Wrote default configuration to: {}", path);
        return Ok(());
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => {
            eprintln!("📋 Loading configuration from: {}", path);
            Config::load_from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path))?
        }
        None => Config::default(),
    };

    let roster_path = required_path(&matches, "roster")?;
    let last_year_path = required_path(&matches, "last_year")?;
    info!(roster = %roster_path.display(), last_year = %last_year_path.display(), "starting");

    let outcome = match speaker_scheduler::run(roster_path, last_year_path, &config, &mut rand::rng()) {
        Ok(outcome) => outcome,
        // Unreadable inputs are reported like a bad argument, with clap's usage exit code
        Err(err) if is_usage_error(&err) => cmd.error(ErrorKind::Io, err.to_string()).exit(),
        Err(err) => return Err(err).context("Scheduling failed"),
    };

    report::print_report(&outcome.roster, &outcome.schedule, matches.get_flag("show-draws"));
    Ok(())
}

fn required_path<'a>(matches: &'a clap::ArgMatches, id: &str) -> Result<&'a Path> {
    matches
        .get_one::<PathBuf>(id)
        .map(PathBuf::as_path)
        .with_context(|| format!("Missing required argument <{}>", id))
}

fn is_usage_error(err: &Error) -> bool {
    matches!(err, Error::Read { .. })
}
