//! CLI tool for compiling stored presentations into PPTX files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slidepack_core::{BuiltinLayouts, ExportFormat};
use slidepack_export::{parse_format, ExportConfig, Exporter, MemoryStore};
use slidepack_pptx::{PackageInspector, PackageSummary};
use std::path::{Path, PathBuf};

/// Compile presentation records into slide decks.
#[derive(Parser, Debug)]
#[command(name = "slidepack")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory finished files are written to
    #[arg(long, global = true, env = "SLIDEPACK_EXPORT_DIR", default_value = "exports")]
    export_dir: PathBuf,

    /// Parent directory of per-export working directories (default: system temp dir)
    #[arg(long, global = true, env = "SLIDEPACK_TEMP_ROOT")]
    temp_root: Option<PathBuf>,

    /// Directory holding the placeholder picture
    #[arg(long, global = true, env = "SLIDEPACK_ASSETS_DIR", default_value = "assets")]
    assets_dir: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export presentations from JSON record files
    Export {
        /// JSON file(s) holding one record or an array of records
        #[arg(required = true)]
        records: Vec<PathBuf>,

        /// Only export these presentation ids (default: every loaded record)
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "pptx")]
        format: String,

        /// Print each result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize produced PPTX files
    Inspect {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match &args.command {
        Command::Export {
            records,
            ids,
            format,
            json,
        } => {
            let format = parse_format(format).context("Cannot export")?;
            let config = build_config(&args);
            run_export(&config, records, ids, format, *json)
        }
        Command::Inspect { files } => run_inspect(files),
    }
}

fn build_config(args: &Args) -> ExportConfig {
    let temp_root = args
        .temp_root
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("slidepack"));
    ExportConfig::new(&args.export_dir, temp_root, &args.assets_dir)
}

fn run_export(
    config: &ExportConfig,
    records: &[PathBuf],
    ids: &[String],
    format: ExportFormat,
    json: bool,
) -> Result<()> {
    config.prepare().context("Failed to prepare export directories")?;

    let mut store = MemoryStore::new();
    for path in records {
        let count = store
            .load_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        log::debug!("Loaded {} records from {}", count, path.display());
    }

    let targets: Vec<String> = if ids.is_empty() {
        store.ids().map(String::from).collect()
    } else {
        ids.to_vec()
    };

    let layouts = BuiltinLayouts::new();
    let exporter = Exporter::new(config, &layouts);
    let mut failed = 0;

    for id in &targets {
        match exporter.export_by_id(&store, id, format) {
            Ok(outcome) => {
                if json {
                    println!("{}", serde_json::to_string(&outcome)?);
                } else {
                    println!("{}", outcome.path.display());
                }
            }
            Err(e) => {
                eprintln!("Error exporting {}: {}", id, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} exports failed", failed, targets.len());
    }
    Ok(())
}

fn run_inspect(files: &[PathBuf]) -> Result<()> {
    let inspector = PackageInspector::new();
    for path in files {
        let summary = inspector
            .inspect_file(path)
            .with_context(|| format!("Failed to inspect {}", path.display()))?;
        print!("{}", format_summary(path, &summary));
    }
    Ok(())
}

/// Human-readable summary of one package.
fn format_summary(path: &Path, summary: &PackageSummary) -> String {
    let mut out = format!(
        "{}: {} slides, {} relationships",
        path.display(),
        summary.slide_count(),
        summary.relationships
    );
    if let Some(title) = &summary.title {
        out.push_str(&format!(" ({})", title));
    }
    out.push('\n');

    for slide in &summary.slides {
        out.push_str(&format!("  slide {}", slide.number));
        if slide.pictures > 0 {
            out.push_str(&format!(", {} pictures", slide.pictures));
        }
        if slide.has_notes {
            out.push_str(", notes");
        }
        out.push('\n');
        for line in &slide.lines {
            out.push_str(&format!("    {}\n", line.replace('\n', " / ")));
        }
    }
    out
}
