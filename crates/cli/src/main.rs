use std::{error::Error, fs::File, path::PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use api_types::BoxType;
use ledger::{Client, Credentials, Ledger, RawEntry, exports};

mod config;

const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Parser, Debug)]
#[command(name = "cassetta_cli")]
#[command(about = "Command line client for the Cassetta box ledger")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override username (password is never read from argv).
    #[arg(long)]
    username: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the current session.
    Session,
    /// List stored entries, newest first.
    List,
    /// Record one production entry.
    Add(EntryArgs),
    /// Replace the raw fields of an existing entry.
    Edit(EditArgs),
    /// Delete an entry by id.
    Delete(DeleteArgs),
    /// Import entries from a CSV file, all-or-nothing.
    Import(FileArgs),
    /// Export every stored entry to a CSV file.
    Export(FileArgs),
    /// Print aggregate totals per box type.
    Stats,
}

#[derive(Args, Debug)]
struct EntryArgs {
    /// Entry date (dd/mm/yyyy); today when omitted.
    #[arg(long)]
    date: Option<String>,
    /// Box type: normal, double or flush.
    #[arg(long)]
    box_type: String,
    /// Number of boxes produced; must be > 0.
    #[arg(long)]
    count: i64,
    /// Total cost of the batch, in MAD.
    #[arg(long)]
    total_cost: f64,
}

#[derive(Args, Debug)]
struct EditArgs {
    #[arg(long)]
    id: Uuid,

    #[command(flatten)]
    entry: EntryArgs,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    #[arg(long)]
    id: Uuid,
}

#[derive(Args, Debug)]
struct FileArgs {
    path: PathBuf,
}

fn parse_box_type(raw: &str) -> Result<BoxType, String> {
    match raw {
        "normal" | "normal_box" => Ok(BoxType::NormalBox),
        "double" | "double_box" => Ok(BoxType::DoubleBox),
        "flush" | "flush_box" => Ok(BoxType::FlushBox),
        other => Err(format!("unsupported box type: {other}")),
    }
}

fn parse_entry(args: &EntryArgs) -> Result<RawEntry, Box<dyn Error + Send + Sync>> {
    let date = match args.date.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|err| format!("bad date: {err}"))?,
        None => Local::now().date_naive(),
    };
    let box_type = parse_box_type(&args.box_type)?;

    Ok(RawEntry {
        date,
        box_type,
        number_of_boxes: args.count,
        total_cost: args.total_cost,
    })
}

fn print_entries(ledger: &Ledger) {
    for entry in ledger.entries() {
        println!(
            "{}  {}  {:<10}  {:>6}  {:>12.2}  {:>10.2}  {:>12.2}",
            entry.id,
            entry.date.format(DATE_FORMAT),
            entry.box_type.label(),
            entry.number_of_boxes,
            entry.total_cost,
            entry.unit_margin,
            entry.total_margin,
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let mut settings = config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(username) = cli.username {
        settings.username = username;
    }

    let client = Client::new(
        &settings.base_url,
        Credentials {
            username: settings.username,
            password: settings.password,
        },
    )?;
    let mut ledger = Ledger::new(client.clone());

    match cli.command {
        Command::Session => {
            let session = client.session().await?;
            println!("signed in as: {}", session.username);
        }
        Command::List => {
            ledger.fetch_all().await?;
            print_entries(&ledger);
        }
        Command::Add(args) => {
            let raw = parse_entry(&args)?;
            ledger.create(raw).await?;
            println!("created entry: {}", ledger.entries()[0].id);
        }
        Command::Edit(args) => {
            let raw = parse_entry(&args.entry)?;
            ledger.update(args.id, raw).await?;
            println!("updated entry: {}", args.id);
        }
        Command::Delete(args) => {
            ledger.delete(args.id).await?;
            println!("deleted entry: {}", args.id);
        }
        Command::Import(args) => {
            let file = File::open(&args.path)?;
            let raws = exports::read_csv(file)?;
            let count = raws.len();
            ledger.import_many(raws).await?;
            println!("imported {count} entries from {}", args.path.display());
        }
        Command::Export(args) => {
            ledger.fetch_all().await?;
            let file = File::create(&args.path)?;
            exports::write_csv(file, ledger.entries())?;
            println!(
                "exported {} entries to {}",
                ledger.entries().len(),
                args.path.display()
            );
        }
        Command::Stats => {
            ledger.fetch_all().await?;
            let stats = ledger.stats_by_type();
            for box_type in BoxType::ALL {
                // Absent types read as zero.
                let entry = stats.get(&box_type).copied().unwrap_or_default();
                println!(
                    "{:<10}  boxes: {:>6}  total cost: {:>12.2}  total margin: {:>12.2}",
                    box_type.label(),
                    entry.count,
                    entry.total_cost,
                    entry.total_margin,
                );
            }
        }
    }

    Ok(())
}
