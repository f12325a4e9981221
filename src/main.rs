//! Examtab CLI - per-class cross-tab reports from a registration roster
//!
//! # Main Command
//!
//! ```bash
//! examtab analyze roster.csv               # Write one CSV report per class
//! examtab analyze roster.csv --format json # JSON matrices instead
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! examtab parse roster.csv                 # Typed roster rows as JSON
//! examtab classes roster.csv               # List detected classes
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use examtab::{
    extract_classes, parse_file_auto, rows_from_records, spawn_analysis, Columns, CsvSink,
    JsonSink, ProgressEvent, ProgressObserver, ReportObserver,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "examtab")]
#[command(about = "Cross-tab exam registration reports, one per class", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a roster and write one report per class
    Analyze {
        /// Input roster CSV file
        input: PathBuf,

        /// Directory for the per-class report files
        #[arg(short, long, default_value = "reports")]
        out_dir: PathBuf,

        /// Report file format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Csv)]
        format: ReportFormat,
    },

    /// Parse a roster and output the typed rows as JSON
    Parse {
        /// Input roster CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the classes detected in a roster
    Classes {
        /// Input roster CSV file
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Csv,
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            input,
            out_dir,
            format,
        } => cmd_analyze(input, out_dir, format).await,

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Classes { input } => cmd_classes(&input),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_analyze(
    input: PathBuf,
    out_dir: PathBuf,
    format: ReportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Analyzing roster: {}", input.display());

    let observer = Arc::new(ProgressObserver::new());
    let mut events = observer.subscribe();

    // Print progress while the run executes on the blocking pool.
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let ProgressEvent::Status(message) = event {
                eprintln!("   {message}");
            }
        }
    });

    let shared: Arc<dyn ReportObserver> = observer.clone();
    let handle = match format {
        ReportFormat::Csv => spawn_analysis(input, CsvSink::new(&out_dir), shared),
        ReportFormat::Json => spawn_analysis(input, JsonSink::new(&out_dir), shared),
    };

    let result = handle.await?;
    drop(observer); // last sender gone, printer drains and exits
    let _ = printer.await;

    let summary = result?;
    eprintln!("   Encoding: {}", summary.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(summary.delimiter));
    eprintln!(
        "✅ {} report sections from {} rows in {}",
        summary.classes,
        summary.rows,
        out_dir.display()
    );
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing roster: {}", input.display());

    let parsed = parse_file_auto(input)?;
    let columns = Columns::resolve(&parsed.headers)?;
    let rows = rows_from_records(&parsed.records, &columns);

    eprintln!("   Encoding: {}", parsed.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(parsed.delimiter));
    eprintln!("✅ Parsed {} rows", rows.len());

    let json = serde_json::to_string_pretty(&rows)?;
    write_output(&json, output)?;
    Ok(())
}

fn cmd_classes(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = parse_file_auto(input)?;
    let columns = Columns::resolve(&parsed.headers)?;
    let rows = rows_from_records(&parsed.records, &columns);

    let classes = extract_classes(&rows);
    eprintln!("📋 {} classes in {} rows:", classes.len(), rows.len());
    for class in classes {
        println!("{class}");
    }
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
