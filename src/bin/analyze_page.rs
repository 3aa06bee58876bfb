//! Analyze One Detected Page
//!
//! Reads a JSON description of a detected page (size, line segments,
//! recognized fragments), runs the layout pipeline, and prints the
//! reconstructed reading-order text.
//!
//! Usage:
//!   cargo run --release --bin analyze_page -- page.json
//!   cargo run --release --bin analyze_page -- page.json --tables
//!   cargo run --release --bin analyze_page -- page.json --json

use scan_oxide::pipeline::{DetectedPage, LayoutPipeline, PageAnalysis};
use std::fs;
use std::path::PathBuf;
use std::process;

struct AnalyzeConfig {
    input: PathBuf,
    emit_json: bool,
    show_tables: bool,
    verbose: bool,
}

impl AnalyzeConfig {
    fn from_args() -> Option<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut input = None;
        let mut emit_json = false;
        let mut show_tables = false;
        let mut verbose = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--json" => emit_json = true,
                "--tables" => show_tables = true,
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => return None,
                other => {
                    if input.is_none() {
                        input = Some(PathBuf::from(other));
                    }
                },
            }
            i += 1;
        }

        input.map(|input| Self {
            input,
            emit_json,
            show_tables,
            verbose,
        })
    }
}

fn analyze(config: &AnalyzeConfig) -> Result<PageAnalysis, Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(&config.input)?;
    let page: DetectedPage = serde_json::from_str(&raw)?;

    if config.verbose {
        println!(
            "Loaded page {}x{}: {} line(s), {} fragment(s)",
            page.width,
            page.height,
            page.lines.len(),
            page.fragments.len()
        );
    }

    let pipeline = LayoutPipeline::new();
    Ok(pipeline.process_detected(&page)?)
}

fn main() {
    env_logger::init();

    let config = match AnalyzeConfig::from_args() {
        Some(config) => config,
        None => {
            eprintln!("Usage: analyze_page <page.json> [--json] [--tables] [--verbose]");
            process::exit(2);
        },
    };

    let analysis = match analyze(&config) {
        Ok(analysis) => analysis,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        },
    };

    if config.emit_json {
        match serde_json::to_string_pretty(&analysis) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            },
        }
        return;
    }

    println!("Page Analysis");
    println!("=============");
    println!("{}", analysis.summary());

    if !analysis.errors.is_empty() {
        println!();
        for error in &analysis.errors {
            println!("warning: {}", error);
        }
    }

    if config.show_tables {
        for (i, table) in analysis.tables.iter().enumerate() {
            println!();
            println!(
                "Table {} ({}x{}, confidence {:.2}{})",
                i + 1,
                table.rows,
                table.cols,
                table.confidence,
                if table.has_header { ", header row" } else { "" }
            );
            println!("{}", table.flattened_text());
        }
    }

    println!();
    println!("{}", analysis.text);
}
