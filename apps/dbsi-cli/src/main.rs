//! `dbsi` binary
//!
//! Evaluates a CTE DB-SI project file and writes its justification report.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use dbsi_cli::commands::{evaluate_project, format_json, format_text, write_report};
use dbsi_cli::ProjectFile;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use typst_engine::{report::DEFAULT_TIMEOUT_MS, OutputFormat, TypstRenderer};

#[derive(Parser, Debug)]
#[command(name = "dbsi")]
#[command(version, about = "CTE DB-SI fire safety compliance calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate every section and print the results
    Evaluate {
        #[command(flatten)]
        project: ProjectArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Evaluate every section and write the report document
    Report {
        #[command(flatten)]
        project: ProjectArgs,

        /// Directory the report is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Output format: pdf, svg or png
        #[arg(long, default_value = "pdf")]
        format: OutputFormat,

        /// Compilation timeout in milliseconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,

        /// Resolution for PNG output
        #[arg(long)]
        ppi: Option<u32>,

        /// Date printed in the footer (YYYY-MM-DD), today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print the written path as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct ProjectArgs {
    /// Project file (JSON)
    file: PathBuf,

    /// Recommend a review for failed checks that carry no advice
    #[arg(long)]
    generic_advice: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries results, logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Evaluate { project, json } => {
            let file = ProjectFile::load(&project.file)?;
            let evaluated = evaluate_project(&file, project.generic_advice)?;
            if json {
                println!("{}", format_json(&evaluated)?);
            } else {
                print!("{}", format_text(&evaluated));
            }
        }
        Command::Report {
            project,
            out_dir,
            format,
            timeout_ms,
            ppi,
            date,
            json,
        } => {
            let file = ProjectFile::load(&project.file)?;
            let evaluated = evaluate_project(&file, project.generic_advice)?;

            let mut renderer = TypstRenderer::new(format).with_timeout(timeout_ms);
            if let Some(ppi) = ppi {
                renderer = renderer.with_ppi(ppi);
            }
            if let Some(date) = date {
                renderer = renderer.at(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
            }
            let path = write_report(&evaluated.report, &renderer, &out_dir).await?;

            if json {
                let out = serde_json::json!({
                    "path": path,
                    "rejected": evaluated.rejected,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
