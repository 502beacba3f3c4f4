use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_stats::cli::{
    handle_budget_command, handle_expense_command, handle_stats_command, BudgetCommands,
    ExpenseCommands, StatsArgs,
};
use expense_stats::config::{paths::ExpensePaths, settings::Settings};
use expense_stats::logging::init_tracing;
use expense_stats::storage::Storage;

#[derive(Parser)]
#[command(
    name = "expense-stats",
    version,
    about = "Expense tracking with weekly, monthly and yearly statistics",
    long_about = "expense-stats records expenses, groups them by category and \
                  calendar period, and tracks monthly spending against budget caps."
)]
struct Cli {
    /// Override the data directory (also EXPENSE_STATS_DATA_DIR)
    #[arg(long, global = true, env = "EXPENSE_STATS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Spending statistics for a week, month or year
    Stats(StatsArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => ExpensePaths::with_base_dir(dir),
        None => ExpensePaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_level);

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let today = chrono::Local::now().date_naive();

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing expense-stats at: {}", paths.base_dir().display());
            storage.initialize()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  expense-stats budget create Groceries 400");
            println!("  expense-stats expense add 12.50 --category food --budget Groceries");
            println!("  expense-stats stats --period month");
        }
        Some(Commands::Config) => {
            println!("expense-stats Configuration");
            println!("===========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            if !paths.is_initialized() {
                println!("Not initialized yet; run 'expense-stats init' to save settings.");
            }
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Default period:  {}", settings.default_period);
            println!(
                "  Usage status:    ok <= {}%, critical >= {}%",
                settings.usage_thresholds.ok_up_to_percent,
                settings.usage_thresholds.critical_from_percent
            );
            println!("  Log level:       {}", settings.log_level);
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd, today)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd, today)?;
        }
        Some(Commands::Stats(args)) => {
            handle_stats_command(&storage, &settings, args, today)?;
        }
        None => {
            println!("expense-stats - expense tracking with period statistics");
            println!();
            println!("Run 'expense-stats --help' for usage information.");
        }
    }

    Ok(())
}
