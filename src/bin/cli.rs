use realty_ledger::{Ledger, Expense, ExpenseKind, UserName, PersistenceAdapter, StorageConfig,
    config::DEFAULT_LOG_FILTER,
    expense::{Amount, parse_date, format_amount}};

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Context;
use colored::Colorize;
use clap::{Args, Parser, Subcommand};
use log::info;

#[derive(Parser, Debug)]
#[clap(version, about, propagate_version = true)]
struct Cli {
    /// Storage config file; defaults apply when it does not exist
    #[clap(short, long, value_parser, default_value = "resources/storage.toml")]
    config: PathBuf,

    /// Whose ledger to operate on
    #[clap(short, long, value_parser, env = "LEDGER_USER")]
    user: String,

    /// Action to perform
    #[clap(subcommand)]
    action: Subcommands,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// List all recorded expenses
    List,
    /// Record a new expense
    Add(AddExpense),
    /// Show the total and the breakdown per kind
    Summary,
    /// Write all expenses to a CSV file
    Export(Export),
    /// Remove all expenses
    Clear,
    /// Show where ledgers are stored
    Backend
}

#[derive(Args, Debug)]
struct AddExpense {
    #[clap(short, long, value_parser)]
    amount: Amount,

    /// deed_tax, land_transfer_fee, agency_fee, renovation, or any custom name
    #[clap(short, long, value_parser, default_value = "other")]
    kind: String,

    /// Date paid, YYYY-MM-DD (today if omitted)
    #[clap(long, value_parser)]
    date: Option<String>,

    #[clap(short, long, value_parser)]
    description: Option<String>
}

impl AddExpense {
    fn to_expense(&self) -> anyhow::Result<Expense> {
        let date = match &self.date {
            Some(raw) => parse_date(raw)?,
            None => chrono::Local::now().date_naive()
        };
        let kind = ExpenseKind::from_label(&self.kind);
        Ok(Expense::new(date, kind, self.amount, self.description.as_deref())?)
    }
}

#[derive(Args, Debug)]
struct Export {
    /// Output file (realty_expenses_YYYYMMDD.csv if omitted)
    #[clap(short, long, value_parser)]
    output: Option<PathBuf>
}

fn load_config(path: &Path) -> anyhow::Result<StorageConfig> {
    let config = if path.exists() {
        StorageConfig::read(path)
            .with_context(|| format!("config {}", path.display()))?
    } else {
        StorageConfig::default()
    };
    Ok(config.with_env_overrides())
}

fn print_expenses(ledger: &Ledger) {
    if ledger.is_empty() {
        println!("No expenses recorded yet.");
        return;
    }
    for (i, expense) in ledger.expenses().iter().enumerate() {
        println!("{:>3}. {}", i + 1, expense);
    }
}

fn print_summary(ledger: &Ledger) {
    let summary = ledger.summary();
    if summary.kinds.is_empty() {
        println!("No statistics yet.");
        return;
    }

    println!("{}: {}", "Total".bold(), format_amount(summary.total).green());
    for kind in &summary.kinds {
        println!("  {}: {} ({:.1}%)", kind.label, format_amount(kind.amount), kind.share);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(DEFAULT_LOG_FILTER));
    let args = Cli::parse();

    let user = UserName::parse(&args.user)?;
    let config = load_config(&args.config)?;
    let adapter = PersistenceAdapter::from_config(&config)?;

    if let Subcommands::Backend = args.action {
        println!("{}", adapter.describe());
        return Ok(());
    }

    let mut ledger = adapter.load_ledger(&user)
        .with_context(|| format!("failed to load the ledger of {}", user))?;

    match args.action {
        Subcommands::List => {
            print_expenses(&ledger);
            return Ok(());
        },
        Subcommands::Summary => {
            print_summary(&ledger);
            return Ok(());
        },
        Subcommands::Export(export) => {
            let path = export.output.unwrap_or_else(|| PathBuf::from(
                format!("realty_expenses_{}.csv", chrono::Local::now().format("%Y%m%d"))));
            fs::write(&path, ledger.to_csv())
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported {} expense(s) to {}", ledger.expenses().len(), path.display());
            return Ok(());
        },
        Subcommands::Add(add) => {
            let expense = ledger.add_expense(add.to_expense()?)?;
            println!("Added {} expense", expense.kind.to_string().bold());
        },
        Subcommands::Clear => {
            ledger.clear();
            println!("Cleared all expenses");
        },
        Subcommands::Backend => unreachable!()
    }

    adapter.save_ledger(&user, &ledger)
        .with_context(|| format!("failed to save the ledger of {}", user))?;
    info!("ledger of {} saved", user);
    Ok(())
}
