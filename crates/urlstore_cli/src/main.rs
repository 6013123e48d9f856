//! Command-line probe for `urlstore_core`.
//!
//! # Responsibility
//! - Exercise the store operations against a database file from a shell.
//! - Keep output line-oriented for quick local sanity checks.

use clap::{Parser, Subcommand};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use urlstore_core::{core_version, default_log_level, init_logging, UrlRepository, UrlStore};

const DB_PATH_ENV: &str = "URLSTORE_DB_PATH";
const LOG_DIR_ENV: &str = "URLSTORE_LOG_DIR";

#[derive(Debug, Parser)]
#[command(name = "urlstore", version)]
struct Cli {
    /// SQLite file to use; an in-memory database when omitted.
    #[arg(long, env = DB_PATH_ENV)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long, env = LOG_DIR_ENV)]
    log_dir: Option<String>,

    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register ALIAS for URL.
    Save { url: String, alias: String },
    /// Print the URL registered for ALIAS.
    Get { alias: String },
    /// Remove ALIAS.
    Delete { alias: String },
    /// Print crate version and the record stored under ALIAS, if given.
    Info { alias: Option<String> },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Save { .. } => "save",
            Self::Get { .. } => "get",
            Self::Delete { .. } => "delete",
            Self::Info { .. } => "info",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let store = match cli.db.as_ref() {
        Some(path) => UrlStore::open(path)?,
        None => UrlStore::open_in_memory()?,
    };
    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );

    match cli.command {
        Command::Save { url, alias } => {
            let id = store.create(&url, &alias)?;
            println!("saved alias={alias} id={id}");
        }
        Command::Get { alias } => {
            println!("{}", store.resolve(&alias)?);
        }
        Command::Delete { alias } => {
            store.delete(&alias)?;
            println!("deleted alias={alias}");
        }
        Command::Info { alias } => {
            println!("urlstore_core version={}", core_version());
            if let Some(alias) = alias {
                match store.get_record(&alias)? {
                    Some(record) => println!(
                        "record id={} alias={} url={}",
                        record.id, record.alias, record.url
                    ),
                    None => println!("record alias={alias} absent"),
                }
            }
        }
    }

    Ok(())
}
