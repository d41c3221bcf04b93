use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stockwatch::render::{banner, format_table};
use stockwatch::{
    InsertOutcome, Inventory, Monitor, NewStock, Result, Settings, StockError, StockStore,
    StockUpdate, TableRenderer, UpdateOutcome, generate_unique_code,
};

#[derive(Parser, Debug)]
#[command(name = "stockwatch", version, about = "Track stock levels and watch them change live")]
struct Cli {
    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides the settings file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Product code pattern such as EUK111111
    #[arg(long, global = true)]
    format: Option<String>,

    /// Seconds between monitor ticks
    #[arg(long, global = true)]
    interval: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the stock table if it is missing
    Init,
    /// Print the current stock table
    List,
    /// Add an item; a code is generated when none is given
    Add {
        item: String,
        #[arg(long, default_value = "")]
        code: String,
        #[arg(long, default_value_t = 0)]
        quantity: u64,
        #[arg(long, default_value_t = stockwatch::DEFAULT_LOW_THRESHOLD)]
        threshold: u64,
        #[arg(long)]
        on_order: bool,
    },
    /// Replace code, quantity, threshold and on-order flag of an item
    Update {
        item: String,
        /// New product code; empty clears it
        #[arg(long, default_value = "")]
        code: String,
        #[arg(long)]
        quantity: u64,
        #[arg(long)]
        threshold: u64,
        #[arg(long)]
        on_order: bool,
    },
    /// Delete an item by name
    Delete { item: String },
    /// Print a product code not yet in use
    GenerateCode,
    /// Redraw the stock table whenever it changes
    Monitor,
}

fn main() -> ExitCode {
    // Logs go to stderr so they never mix with the table on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err, &mut io::stderr());
            ExitCode::FAILURE
        }
    }
}

/// Print a failed command as a single line
fn report_failure(err: &StockError, out: &mut impl Write) {
    // Nothing left to report to if stderr itself is gone.
    let _ = writeln!(out, "Error: {err}");
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(db) = &cli.db {
        settings.database_path = db.clone();
    }
    if let Some(format) = &cli.format {
        settings.code_format = format.clone();
    }
    if let Some(interval) = cli.interval {
        settings.poll_interval_secs = interval;
    }
    settings.validate()?;
    Ok(settings)
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;
    let store = StockStore::new(&settings.database_path).with_busy_timeout(settings.busy_timeout());
    store.create_table_if_absent()?;
    let inventory = Inventory::new(store.clone(), settings.code_format());

    match cli.command {
        Command::Init => {
            println!("Stock table ready in {}", settings.database_path.display());
        }
        Command::List => {
            print!("{}", format_table(&inventory.list()?));
        }
        Command::Add { item, code, quantity, threshold, on_order } => {
            let new = NewStock {
                product_code: code,
                item: item.clone(),
                quantity,
                low_threshold: threshold,
                on_order,
            };
            match inventory.add(new)? {
                InsertOutcome::Inserted(row) => println!("Added {} as {}", row.item, row.product_code),
                InsertOutcome::Rejected(key) => println!("Skipped {item}: {key} already in use"),
            }
        }
        Command::Update { item, code, quantity, threshold, on_order } => {
            let update = StockUpdate {
                product_code: code,
                quantity,
                low_threshold: threshold,
                on_order,
            };
            match inventory.update(&item, update)? {
                UpdateOutcome::Updated => println!("Updated {item}"),
                UpdateOutcome::NotFound => println!("No item named {item}"),
                UpdateOutcome::Rejected(key) => println!("Skipped {item}: {key} already in use"),
            }
        }
        Command::Delete { item } => {
            if inventory.delete(&item)? {
                println!("Deleted {item}");
            } else {
                println!("No item named {item}");
            }
        }
        Command::GenerateCode => {
            println!("{}", generate_unique_code(&store, inventory.code_format())?);
        }
        Command::Monitor => {
            let renderer = TableRenderer::stdout().with_header(banner());
            Monitor::new(store, renderer, settings.poll_interval()).run();
        }
    }
    Ok(())
}
