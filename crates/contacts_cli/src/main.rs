//! `contacts` command-line entry point.
//!
//! # Responsibility
//! - Expose contact service operations as subcommands for scripts and agents.
//! - Print results as JSON on stdout and errors on stderr.
//!
//! # Exit codes
//! - `0` success, `2` validation failure, `3` not found, `1` anything else.

mod config;

use clap::{Args, Parser, Subcommand};
use config::CliConfig;
use contacts_core::db::open_db;
use contacts_core::{
    init_logging, ContactCreate, ContactQuery, ContactService, ContactServiceError,
    ContactUpdate, SqliteContactRepository,
};
use log::error;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "contacts", version, about = "Manage contacts stored in a local SQLite file")]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = "CONTACTS_DB_PATH")]
    db: Option<PathBuf>,
    /// Log level: trace|debug|info|warn|error.
    #[arg(long, global = true, env = "CONTACTS_LOG_LEVEL")]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, global = true, env = "CONTACTS_LOG_DIR")]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a contact.
    Add(AddArgs),
    /// Show one contact.
    Get { id: String },
    /// Change selected fields of a contact.
    Update(UpdateArgs),
    /// Permanently delete a contact.
    Delete { id: String },
    /// List contacts, optionally filtered by search text and tag.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Case-insensitive search over name, email, phone, company and tags.
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Contacts carrying exactly this tag (case-sensitive).
    Tag { tag: String },
    /// Distinct tags in use.
    Tags,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[command(flatten)]
    details: DetailArgs,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    /// Replace all tags with an empty set.
    #[arg(long, conflicts_with = "tags")]
    clear_tags: bool,
    #[command(flatten)]
    details: DetailArgs,
}

#[derive(Debug, Args)]
struct DetailArgs {
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    position: Option<String>,
    #[arg(long)]
    linkedin: Option<String>,
    /// Repeatable; order is kept.
    #[arg(long = "tag", id = "tags")]
    tags: Vec<String>,
    #[arg(long)]
    notes: Option<String>,
    /// `YYYY-MM-DD`.
    #[arg(long)]
    last_contact_date: Option<String>,
    /// active|inactive|prospect.
    #[arg(long)]
    status: Option<String>,
}

impl From<AddArgs> for ContactCreate {
    fn from(args: AddArgs) -> Self {
        let details = args.details;
        Self {
            name: args.name,
            email: args.email,
            phone: args.phone,
            company: details.company,
            position: details.position,
            linkedin: details.linkedin,
            tags: details.tags,
            notes: details.notes.unwrap_or_default(),
            last_contact_date: details.last_contact_date,
            relationship_status: details.status,
        }
    }
}

impl From<UpdateArgs> for ContactUpdate {
    fn from(args: UpdateArgs) -> Self {
        let details = args.details;
        let tags = if args.clear_tags {
            Some(Vec::new())
        } else if details.tags.is_empty() {
            None
        } else {
            Some(details.tags)
        };
        Self {
            name: args.name,
            email: args.email,
            phone: args.phone,
            company: details.company,
            position: details.position,
            linkedin: details.linkedin,
            tags,
            notes: details.notes,
            last_contact_date: details.last_contact_date,
            relationship_status: details.status,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = CliConfig::resolve(cli.db, cli.log_level, cli.log_dir);

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(&config, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::from(exit_code_for(err.as_ref()))
        }
    }
}

fn run(config: &CliConfig, command: Command) -> Result<(), Box<dyn Error>> {
    let mut conn = open_db(&config.db_path)?;
    let repo = SqliteContactRepository::try_new(&mut conn)?;
    let mut service = ContactService::new(repo);

    match command {
        Command::Add(args) => print_json(&service.create_contact(args.into())?),
        Command::Get { id } => print_json(&service.get_contact(&id)?),
        Command::Update(args) => {
            let id = args.id.clone();
            print_json(&service.update_contact(&id, args.into())?)
        }
        Command::Delete { id } => {
            service.delete_contact(&id)?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        Command::List { search, tag } => {
            print_json(&service.find_contacts(&ContactQuery { search, tag })?)
        }
        Command::Search { query } => print_json(&service.search_contacts(&query)?),
        Command::Tag { tag } => print_json(&service.search_contacts_by_tag(&tag)?),
        Command::Tags => print_json(&service.list_tags()?),
    }
}

fn print_json(value: &impl Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_code_for(err: &(dyn Error + 'static)) -> u8 {
    match err.downcast_ref::<ContactServiceError>() {
        Some(ContactServiceError::Validation(_)) => 2,
        Some(ContactServiceError::NotFound(_)) => 3,
        _ => 1,
    }
}
