use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde_json::json;
use tracing::info;

use crate::dataset::Dataset;
use crate::loader;
use crate::query::{DiscoverOutcome, DiscoverParams, QueryEngine, StatsParams, StatsResponse};

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Args)]
pub struct ColumnsCommand {
    /// Path to the dataset file (.parquet or .csv)
    pub file: PathBuf,

    /// Prefix to match column names against (omit to list every column)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Number of leading rows to skip in each matched series
    #[arg(long, default_value = "0")]
    pub skip: usize,

    /// Slice stop for each matched series (a raw stop index, not a count)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Name of the time index column (default: first datetime-typed column)
    #[arg(long)]
    pub time_column: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

impl ColumnsCommand {
    pub fn execute(self) -> Result<()> {
        if let Some(search) = &self.search {
            info!("Discovering columns matching prefix '{}'", search);
        } else {
            info!("Listing all columns");
        }

        let dataset = Arc::new(loader::load_file(&self.file, self.time_column.as_deref())?);
        let engine = QueryEngine::new(dataset);

        let params = DiscoverParams {
            search: self.search,
            skip: self.skip,
            limit: self.limit,
        };
        let outcome = engine.discover(&params);

        match self.format {
            OutputFormat::Json => print_discover_json(engine.dataset(), &outcome)?,
            OutputFormat::Table => print_discover_table(engine.dataset(), &outcome),
        }

        Ok(())
    }
}

#[derive(Args)]
pub struct StatsCommand {
    /// Path to the dataset file (.parquet or .csv)
    pub file: PathBuf,

    /// Comma-separated column names (omit for every column)
    #[arg(short, long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Inclusive range start, formatted YYYY-MM-DD HH:MM:SS (default: first timestamp)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Inclusive range end, formatted YYYY-MM-DD HH:MM:SS (default: last timestamp)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Name of the time index column (default: first datetime-typed column)
    #[arg(long)]
    pub time_column: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

impl StatsCommand {
    pub fn execute(self) -> Result<()> {
        info!(
            "Computing statistics for {:?} between {:?} and {:?}",
            self.columns, self.start_date, self.end_date
        );

        let dataset = Arc::new(loader::load_file(&self.file, self.time_column.as_deref())?);
        let engine = QueryEngine::new(dataset);

        let params = StatsParams {
            columns: self.columns,
            start_date: self.start_date,
            end_date: self.end_date,
        };
        let response = engine.stats(&params)?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
            OutputFormat::Table => print_stats_table(&response),
        }

        Ok(())
    }
}

fn print_discover_json(dataset: &Dataset, outcome: &DiscoverOutcome) -> Result<()> {
    let payload = match outcome {
        DiscoverOutcome::AllColumns { columns } => json!({ "columns": columns }),
        DiscoverOutcome::NoMatch { search } => json!({
            "message": format!("no columns matched the search prefix '{search}'"),
            "suggestions": suggest_columns(dataset, search),
        }),
        DiscoverOutcome::Matched(matched) => serde_json::to_value(matched)?,
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn print_discover_table(dataset: &Dataset, outcome: &DiscoverOutcome) {
    match outcome {
        DiscoverOutcome::AllColumns { columns } => {
            println!("\nColumns ({}):", columns.len());
            println!("{:-<60}", "");
            for name in columns {
                println!("  {name}");
            }
        }
        DiscoverOutcome::NoMatch { search } => {
            println!("\nNo columns matched the search prefix '{search}'");
            let suggestions = suggest_columns(dataset, search);
            if !suggestions.is_empty() {
                println!("Did you mean: {}", suggestions.join(", "));
            }
        }
        DiscoverOutcome::Matched(matched) => {
            println!("\nMatched columns ({}):", matched.matched.len());
            println!("{:-<60}", "");
            for (name, slice) in &matched.matched {
                println!("Column: {name}");
                println!("Rows: {}", slice.values.len());
                for (date, value) in slice.dates.iter().zip(&slice.values) {
                    println!("  {date}  {value}");
                }
                println!("{:-<60}", "");
            }
        }
    }
}

fn print_stats_table(response: &StatsResponse) {
    println!(
        "\nStatistics from {} to {}:",
        response.start_date, response.end_date
    );
    println!("{:-<80}", "");
    for (name, summary) in &response.stats {
        println!("Column: {name}");
        println!("  count: {}", summary.count);
        println!("  mean:  {}", fmt_stat(summary.mean));
        println!("  std:   {}", fmt_stat(summary.std));
        println!("  min:   {}", fmt_stat(summary.min));
        println!("  p25:   {}", fmt_stat(summary.p25));
        println!("  p50:   {}", fmt_stat(summary.p50));
        println!("  p75:   {}", fmt_stat(summary.p75));
        println!("  max:   {}", fmt_stat(summary.max));
        println!("{:-<80}", "");
    }
    if !response.unresolved_columns.is_empty() {
        println!("Unknown columns: {}", response.unresolved_columns.join(", "));
    }
}

fn fmt_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.6}"),
        None => "null".to_string(),
    }
}

/// Closest column names to a prefix that matched nothing, for the
/// "did you mean" hint in the no-match response.
fn suggest_columns(dataset: &Dataset, search: &str) -> Vec<String> {
    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(i64, String)> = dataset
        .columns()
        .iter()
        .filter_map(|c| {
            matcher
                .fuzzy_match(&c.name, search)
                .map(|score| (score, c.name.clone()))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(3).map(|(_, name)| name).collect()
}
