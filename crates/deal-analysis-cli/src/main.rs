mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::amortize::AmortizeArgs;
use commands::analyze::{AnalyzeArgs, CompareArgs};

/// Real-estate deal analysis
#[derive(Parser)]
#[command(
    name = "deal",
    version,
    about = "Real-estate deal analysis",
    long_about = "Analyse a property under a buy-and-hold, house-hack, BRRRR, short-term \
                  rental, commercial or fix-and-flip strategy with decimal precision. \
                  Reports NOI, cap rate, cash-on-cash return, cash flow, DSCR and \
                  maximum allowable offer."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log analysis steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse one deal under the strategy named in its input
    Analyze(AnalyzeArgs),
    /// Analyse several strategies for the same property side by side
    Compare(CompareArgs),
    /// Monthly payment and amortization schedule of a fixed-rate loan
    Amortize(AmortizeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "deal_analysis_core=debug,deal_analysis_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries the report, so logs go to stderr
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analyze::run_analyze(args),
        Commands::Compare(args) => commands::analyze::run_compare(args),
        Commands::Amortize(args) => commands::amortize::run_amortize(args),
        Commands::Version => {
            println!("deal {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
