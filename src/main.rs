//! KeyProbe - keyboard firmware descriptor inspector
//!
//! This binary reads a firmware descriptor file, normalizes it into the
//! spatial keyboard model, and prints a human-readable summary or a JSON
//! dump. All parsing lives in the library; this is presentation glue.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keyprobe::config::{Config, OutputFormat};
use keyprobe::models::KeyboardModel;
use keyprobe::parser;
use keyprobe::session::{TestReport, TestSession};

/// KeyProbe - inspect keyboard firmware descriptors
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a descriptor file and print the normalized keyboard model
    Inspect(InspectArgs),
    /// Parse a descriptor file and print a fresh key-test report skeleton
    Report(ReportArgs),
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Args)]
struct InspectArgs {
    /// Path to a descriptor file (.json, .keymap, .c, .h, .hex, .uf2)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output the full model as JSON
    #[arg(long)]
    json: bool,
}

impl InspectArgs {
    fn execute(&self, config: &Config) -> Result<()> {
        let model = parser::parse_file(&self.file)?;

        if self.json || config.output.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&model)?);
        } else {
            print_summary(&model, config.output.show_layers);
        }
        Ok(())
    }
}

/// Arguments for the report command
#[derive(Debug, Clone, Args)]
struct ReportArgs {
    /// Path to a descriptor file (.json, .keymap, .c, .h, .hex, .uf2)
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

impl ReportArgs {
    fn execute(&self) -> Result<()> {
        let model = parser::parse_file(&self.file)?;
        let session = TestSession::new(&model);
        let report = TestReport::from_session(&session, &model);

        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

/// Prints the human-readable model summary.
fn print_summary(model: &KeyboardModel, show_layers: bool) {
    println!("Keyboard: {}", model.name);
    println!("Firmware: {}", model.firmware);
    if let Some(layout) = model.layout {
        println!("Layout:   {} ({}x{})", layout, layout.rows(), layout.cols());
    }
    println!(
        "Keys:     {}{}",
        model.key_count(),
        if model.metadata.is_split || model.has_halved_keys() {
            " (split)"
        } else {
            ""
        }
    );

    if !model.encoders.is_empty() {
        println!("Encoders: {}", model.encoders.len());
    }
    if !model.trackballs.is_empty() {
        println!("Pointers: {}", model.trackballs.len());
    }
    if !model.displays.is_empty() {
        println!("Displays: {}", model.displays.len());
    }

    if show_layers && !model.layers.is_empty() {
        println!("Layers:");
        for layer in &model.layers {
            println!("  {} ({} keycodes)", layer.name, layer.len());
        }
    }

    if let Some(note) = &model.metadata.note {
        println!("Note:     {note}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load().unwrap_or_default();

    match cli.command {
        Command::Inspect(args) => args.execute(&config),
        Command::Report(args) => args.execute(),
    }
}
