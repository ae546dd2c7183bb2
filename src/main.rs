use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use scriptscope::analysis::Scanner;
use scriptscope::config::{ScanConfig, DEFAULT_ROLLDOWN_RUNTIME_PATTERN, DEFAULT_WEBPACK_CHUNK_PREFIX};
use scriptscope::export::{export, ExportData, ExportFormat};
use scriptscope::logger::init_logger;
use scriptscope::source::load_paths;

#[derive(Parser)]
#[command(name = "scriptscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Bundler fingerprinting and duplicate-code analysis for client-side JavaScript", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan script files or directories of scripts
    Scan {
        /// Script files or directories to scan, in order
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,

        /// Prefix of webpack's chunk-loading global
        #[arg(long, default_value = DEFAULT_WEBPACK_CHUNK_PREFIX)]
        chunk_prefix: String,

        /// Count duplicate webpack modules without summing their bytes
        #[arg(long)]
        no_duplicate_bytes: bool,

        /// Regex matched against script paths to detect the rolldown runtime
        #[arg(long, default_value = DEFAULT_ROLLDOWN_RUNTIME_PATTERN)]
        rolldown_pattern: String,
    },
    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet, cli.no_color);

    match cli.command {
        Some(Commands::Scan {
            paths,
            format,
            chunk_prefix,
            no_duplicate_bytes,
            rolldown_pattern,
        }) => {
            let config = ScanConfig {
                webpack_chunk_prefix: chunk_prefix,
                track_duplicate_bytes: !no_duplicate_bytes,
                rolldown_runtime_pattern: rolldown_pattern,
            };

            let scripts = load_paths(&paths).context("Failed to load scripts")?;
            tracing::info!("Loaded {} script(s)", scripts.len());

            let outcome = Scanner::new(config)
                .run_scan(&scripts)
                .context("Scan failed")?;

            let target = paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let data = ExportData::new(target, outcome).with_bytes_tracked(!no_duplicate_bytes);

            export(format, &data, &mut io::stdout().lock()).context("Failed to write report")?;
        }
        Some(Commands::Version) => {
            println!("scriptscope v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("ScriptScope - Bundler fingerprinting for client-side JavaScript");
            println!("Run 'scriptscope scan <PATH>...' to scan scripts");
            println!("Run 'scriptscope --help' for more information");
        }
    }

    Ok(())
}
