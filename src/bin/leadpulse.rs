//! LeadPulse CLI - Command-line interface for the lead triage engine
//!
//! Commands:
//! - triage: Score, prioritize and sort captured leads
//! - engagement: Compute engagement scores for visitor snapshots
//! - export: Render leads (or arbitrary records) as CSV
//! - validate: Check lead records against the storage boundary rules

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use leadpulse::export::{leads_to_csv, records_to_csv};
use leadpulse::store::validate_lead;
use leadpulse::tracker::{engagement_score, VisitorSnapshot};
use leadpulse::triage::{rescore, sort_leads, LeadRecord};
use leadpulse::{EngineError, ENGINE_VERSION, PRODUCER_NAME};

/// LeadPulse - Visitor engagement tracking and lead triage
#[derive(Parser)]
#[command(name = "leadpulse")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Score and triage captured leads", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score, prioritize and sort captured leads
    Triage {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Recompute scores even for records that already carry one
        #[arg(long)]
        rescore_all: bool,
    },

    /// Compute engagement scores for visitor snapshots
    Engagement {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Render leads as CSV
    Export {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Treat input as arbitrary records instead of leads
        #[arg(long)]
        generic: bool,
    },

    /// Check lead records against the storage boundary rules
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// JSON array
    Json,
    /// Pretty-printed JSON array
    JsonPretty,
    /// Newline-delimited JSON (one record per line)
    Ndjson,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), LeadpulseCliError> {
    match cli.command {
        Commands::Triage {
            input,
            output,
            output_format,
            rescore_all,
        } => cmd_triage(&input, &output, output_format, rescore_all),

        Commands::Engagement {
            input,
            output,
            output_format,
        } => cmd_engagement(&input, &output, output_format),

        Commands::Export {
            input,
            output,
            generic,
        } => cmd_export(&input, &output, generic),

        Commands::Validate { input, json } => cmd_validate(&input, json),
    }
}

fn cmd_triage(
    input: &Path,
    output: &Path,
    output_format: OutputFormat,
    rescore_all: bool,
) -> Result<(), LeadpulseCliError> {
    let data = read_input(input)?;
    let mut leads: Vec<LeadRecord> = serde_json::from_str(&data)?;
    if leads.is_empty() {
        return Err(LeadpulseCliError::NoRecords);
    }

    for lead in &mut leads {
        if rescore_all || lead.lead_score == 0 {
            rescore(lead);
        }
    }
    sort_leads(&mut leads);

    write_records(output, &leads, output_format)
}

fn cmd_engagement(
    input: &Path,
    output: &Path,
    output_format: OutputFormat,
) -> Result<(), LeadpulseCliError> {
    let data = read_input(input)?;
    let snapshots: Vec<VisitorSnapshot> = serde_json::from_str(&data)?;
    if snapshots.is_empty() {
        return Err(LeadpulseCliError::NoRecords);
    }

    let reports: Vec<serde_json::Value> = snapshots
        .iter()
        .map(|snapshot| {
            let score = engagement_score(snapshot);
            serde_json::json!({
                "producer": PRODUCER_NAME,
                "session_id": snapshot.session_id,
                "visitor_id": snapshot.visitor_id,
                "score": score.score,
                "likelihood": score.likelihood,
                "contributing_factors": score.contributing_factors,
            })
        })
        .collect();

    write_records(output, &reports, output_format)
}

fn cmd_export(input: &Path, output: &Path, generic: bool) -> Result<(), LeadpulseCliError> {
    let data = read_input(input)?;

    let csv = if generic {
        let records: Vec<serde_json::Value> = serde_json::from_str(&data)?;
        records_to_csv(&records)?
    } else {
        let leads: Vec<LeadRecord> = serde_json::from_str(&data)?;
        if leads.is_empty() {
            return Err(LeadpulseCliError::NoRecords);
        }
        leads_to_csv(&leads)
    };

    write_output(output, &csv)
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), LeadpulseCliError> {
    let data = read_input(input)?;
    let leads: Vec<LeadRecord> = serde_json::from_str(&data)?;

    let mut failures = Vec::new();
    for (index, lead) in leads.iter().enumerate() {
        if let Err(e) = validate_lead(lead) {
            failures.push((index, e.to_string()));
        }
    }

    if json {
        let report = serde_json::json!({
            "producer": PRODUCER_NAME,
            "total": leads.len(),
            "valid": leads.len() - failures.len(),
            "failures": failures
                .iter()
                .map(|(index, message)| serde_json::json!({
                    "index": index,
                    "error": message,
                }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (index, message) in &failures {
            eprintln!("record {index}: {message}");
        }
        println!("{} of {} records valid", leads.len() - failures.len(), leads.len());
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(LeadpulseCliError::ValidationFailed(failures.len()))
    }
}

fn read_input(path: &Path) -> Result<String, LeadpulseCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn write_output(path: &Path, content: &str) -> Result<(), LeadpulseCliError> {
    if path.to_string_lossy() == "-" {
        io::stdout().write_all(content.as_bytes())?;
        Ok(())
    } else {
        fs::write(path, content)?;
        Ok(())
    }
}

fn write_records<T: serde::Serialize>(
    path: &Path,
    records: &[T],
    format: OutputFormat,
) -> Result<(), LeadpulseCliError> {
    let content = match format {
        OutputFormat::Json => serde_json::to_string(records)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(records)?,
        OutputFormat::Ndjson => {
            let mut lines = String::new();
            for record in records {
                lines.push_str(&serde_json::to_string(record)?);
                lines.push('\n');
            }
            lines
        }
    };
    write_output(path, &content)
}

#[derive(Debug)]
enum LeadpulseCliError {
    Io(io::Error),
    Engine(EngineError),
    Json(serde_json::Error),
    NoRecords,
    ValidationFailed(usize),
}

impl From<io::Error> for LeadpulseCliError {
    fn from(e: io::Error) -> Self {
        LeadpulseCliError::Io(e)
    }
}

impl From<EngineError> for LeadpulseCliError {
    fn from(e: EngineError) -> Self {
        LeadpulseCliError::Engine(e)
    }
}

impl From<serde_json::Error> for LeadpulseCliError {
    fn from(e: serde_json::Error) -> Self {
        LeadpulseCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<LeadpulseCliError> for CliError {
    fn from(e: LeadpulseCliError) -> Self {
        match e {
            LeadpulseCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            LeadpulseCliError::Engine(e) => CliError {
                code: "ENGINE_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            LeadpulseCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            LeadpulseCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            LeadpulseCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{count} record(s) failed validation"),
                hint: Some("Run 'leadpulse validate --json' for details".to_string()),
            },
        }
    }
}
