//! Statistics CLI command

use chrono::NaiveDate;
use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::config::settings::Settings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{CategoryTaxonomy, StatsPeriod};
use crate::reports::StatisticsReport;
use crate::storage::Storage;

use super::parse_date;

#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// Period to report on: week, month or year (defaults to the configured period)
    #[arg(short, long)]
    pub period: Option<String>,

    /// Any day inside the period (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Export to CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print JSON instead of a chart
    #[arg(long)]
    pub json: bool,

    /// Show top N categories only
    #[arg(long)]
    pub top: Option<usize>,
}

/// Handle the stats command
pub fn handle_stats_command(
    storage: &Storage,
    settings: &Settings,
    args: StatsArgs,
    today: NaiveDate,
) -> ExpenseResult<()> {
    let period = match args.period.as_deref() {
        Some(p) => p.parse::<StatsPeriod>()?,
        None => settings.default_period,
    };
    let reference = match args.date {
        Some(d) => parse_date(&d, "date")?,
        None => today,
    };

    let taxonomy = CategoryTaxonomy::standard();
    let report = StatisticsReport::generate(storage, &taxonomy, period, reference)?;

    if let Some(path) = args.output {
        let file = File::create(&path).map_err(|e| {
            ExpenseError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        report.export_csv(BufWriter::new(file))?;
        println!("Statistics exported to: {}", path.display());
    } else if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!(
            "{}",
            report.format_terminal(&taxonomy, &settings.currency_symbol, args.top)
        );
    }

    Ok(())
}
