//! Fraud Screener - Main Entry Point
//!
//! Loads the classifier once, then screens transaction CSVs one upload
//! at a time: paths given as operands, or entered interactively.

use anyhow::Result;
use fraud_screener::{AppConfig, FraudClassifier, ScreeningPipeline};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{error, info};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fraud_screener=info".parse()?),
        )
        .init();

    info!("Starting Fraud Screener");

    // Load configuration
    let config = AppConfig::load()?;
    info!(model_path = %config.model.path, "Configuration loaded successfully");

    // Load the classifier once; without it no upload can be served
    let classifier = FraudClassifier::load(&config)?;
    let pipeline = ScreeningPipeline::new(classifier);

    let uploads: Vec<String> = std::env::args().skip(1).collect();
    if uploads.is_empty() {
        run_interactive(&pipeline)
    } else {
        for path in &uploads {
            screen_upload(&pipeline, Path::new(path));
        }
        Ok(())
    }
}

/// Prompt for CSV paths on stdin, one upload per line.
fn run_interactive(pipeline: &ScreeningPipeline) -> Result<()> {
    println!("Credit Card Fraud Screening");
    println!("Enter the path to a transactions CSV to score (empty line quits).");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let path = line.trim();
        if path.is_empty() {
            break;
        }

        screen_upload(pipeline, Path::new(path));
    }

    Ok(())
}

/// Screen one upload and render the outcome. A failure becomes a single
/// user-visible message and the session moves on to the next upload.
fn screen_upload(pipeline: &ScreeningPipeline, path: &Path) {
    match pipeline.screen_file(path) {
        Ok(report) => {
            println!();
            println!("Prediction Results");
            print!("{report}");
            println!();
            println!("Fraud Count");
            print!("{}", report.summary());
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Upload rejected");
            eprintln!("Error processing file: {e}");
        }
    }
}
