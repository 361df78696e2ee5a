//! gradewise CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "gradewise",
    version,
    about = "Heuristic grading and feedback for free-text answers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a single response
    Grade {
        /// Path to a question bank .toml file or directory
        #[arg(long)]
        bank: PathBuf,

        /// Question ID within the bank
        #[arg(long)]
        question: String,

        /// Response text
        #[arg(long, conflicts_with = "response_file")]
        response: Option<String>,

        /// Read the response from a file ("-" for stdin)
        #[arg(long)]
        response_file: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Include keyword and scoring details
        #[arg(long)]
        explain: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a file of submissions
    Batch {
        /// Path to a question bank .toml file or directory
        #[arg(long)]
        bank: PathBuf,

        /// Submissions .toml file
        #[arg(long)]
        submissions: PathBuf,

        /// Max concurrent gradings (overrides config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Output directory (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two grading runs
    Compare {
        /// Baseline run JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current run JSON
        #[arg(long)]
        current: PathBuf,

        /// Regression threshold in percentage points
        #[arg(long, default_value = "5")]
        threshold: f64,

        /// Exit code 1 if regressions found
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to question bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create starter config, question bank and submissions
    Init,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,gradewise_core=info,gradewise_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            bank,
            question,
            response,
            response_file,
            format,
            explain,
            config,
        } => commands::grade::execute(
            bank,
            question,
            response,
            response_file,
            format,
            explain,
            config,
        ),
        Commands::Batch {
            bank,
            submissions,
            parallelism,
            output,
            format,
            config,
        } => {
            commands::batch::execute(bank, submissions, parallelism, output, format, config).await
        }
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
