//! Budget CLI commands
//!
//! Creation, listing and removal of budgets, plus the monthly usage report.

use chrono::NaiveDate;
use clap::Subcommand;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::config::settings::Settings;
use crate::display::format_budget_list;
use crate::error::{ExpenseError, ExpenseResult};
use crate::reports::BudgetUsageReport;
use crate::services::BudgetService;
use crate::storage::Storage;

use super::{parse_amount, parse_date};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget with a monthly cap
    Create {
        /// Budget name
        name: String,
        /// Monthly cap (e.g., "500" or "499.99")
        cap: String,
    },
    /// List budgets
    List,
    /// Delete a budget; its expenses are kept but unlinked
    Delete {
        /// Budget name or ID
        budget: String,
    },
    /// Show this month's usage for every budget
    Usage {
        /// Day whose month to report on (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
    today: NaiveDate,
) -> ExpenseResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Create { name, cap } => {
            let cap = parse_amount(&cap)?;
            let budget = service.create(&name, cap)?;
            println!(
                "Created budget '{}' ({}) with a monthly cap of {}",
                budget.name,
                budget.id,
                budget.cap.format_with_symbol(&settings.currency_symbol)
            );
        }

        BudgetCommands::List => {
            let budgets = service.list()?;
            println!("{}", format_budget_list(&budgets, &settings.currency_symbol));
        }

        BudgetCommands::Delete { budget } => {
            let (budget, unlinked) = service.delete(&budget)?;
            println!("Deleted budget '{}'", budget.name);
            if unlinked > 0 {
                println!("{} expense(s) are no longer linked to a budget", unlinked);
            }
        }

        BudgetCommands::Usage { date, output, json } => {
            let day = match date {
                Some(d) => parse_date(&d, "date")?,
                None => today,
            };
            let report = BudgetUsageReport::generate(storage, &settings.usage_thresholds, day)?;

            if let Some(path) = output {
                let file = File::create(&path).map_err(|e| {
                    ExpenseError::Export(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                report.export_csv(BufWriter::new(file))?;
                println!("Budget usage exported to: {}", path.display());
            } else if json {
                println!("{}", report.to_json()?);
            } else {
                println!("{}", report.format_terminal(&settings.currency_symbol));
            }
        }
    }

    Ok(())
}
