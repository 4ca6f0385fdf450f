//! Process one blood test report and print the result as JSON.
//!
//! Usage:
//!   bloodlens <report.pdf|report.txt> [--no-llm] [--model <tag>] [--ollama-url <url>] [--assess]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use bloodlens::config::PipelineConfig;
use bloodlens::pipeline::{BloodReportProcessor, ExtractionResult, ReportAssessment};

#[derive(Parser)]
#[command(name = "bloodlens")]
#[command(version)]
#[command(about = "Extract, validate and classify blood test report values", long_about = None)]
struct Cli {
    /// Report to process (PDF or plain text)
    file: PathBuf,

    /// Use pattern extraction only, never the language model
    #[arg(long)]
    no_llm: bool,

    /// Model tag (default: first preferred model installed)
    #[arg(long)]
    model: Option<String>,

    /// Ollama base URL
    #[arg(long)]
    ollama_url: Option<String>,

    /// Add per-value classification and emergency indicators
    #[arg(long)]
    assess: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    extraction: &'a ExtractionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    assessment: Option<ReportAssessment>,
}

fn main() -> ExitCode {
    bloodlens::init_tracing();
    let cli = Cli::parse();

    let mut config = PipelineConfig::from_env();
    if cli.no_llm {
        config.use_language_model = false;
    }
    if let Some(model) = cli.model {
        config.model = Some(model);
    }
    if let Some(url) = cli.ollama_url {
        config.ollama_url = url;
    }

    let processor = BloodReportProcessor::new(config);
    let result = match processor.process_file(&cli.file) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(path = %cli.file.display(), error = %e, "Report could not be read");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let output = Output {
        extraction: &result,
        assessment: cli.assess.then(|| processor.assess(&result)),
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize result: {e}");
            ExitCode::FAILURE
        }
    }
}
