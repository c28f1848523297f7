//! Command-line interface for pathwise.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "pathwise",
    version,
    about = "Knowledge-graph learning paths and study analytics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and example curriculum
    Init,

    /// Validate curriculum TOML files
    Validate {
        /// Path to curriculum file or directory
        #[arg(long)]
        curriculum: PathBuf,
    },

    /// Find the shortest learning path between two topics
    Path {
        /// Curriculum file
        #[arg(long)]
        curriculum: PathBuf,

        /// Starting topic
        #[arg(long)]
        from: String,

        /// Target topic
        #[arg(long)]
        to: String,
    },

    /// List the prerequisites of a topic
    Prereqs {
        /// Curriculum file
        #[arg(long)]
        curriculum: PathBuf,

        /// Topic to inspect
        #[arg(long)]
        topic: String,

        /// Include prerequisites of prerequisites, in study order
        #[arg(long)]
        transitive: bool,
    },

    /// Compute ability metrics for a topic session (JSON)
    Analyze {
        /// Topic session JSON file
        #[arg(long)]
        history: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Rank the hours of day with the best average performance
    BestHours {
        /// Performance history JSON file
        #[arg(long)]
        history: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Analyse a learner's session and recommend what to do next
    Recommend {
        /// Learner progress JSON file
        #[arg(long)]
        progress: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Also save the report as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pathwise=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { curriculum } => commands::validate::execute(curriculum),
        Commands::Path {
            curriculum,
            from,
            to,
        } => commands::path::execute(curriculum, from, to),
        Commands::Prereqs {
            curriculum,
            topic,
            transitive,
        } => commands::prereqs::execute(curriculum, topic, transitive),
        Commands::Analyze {
            history,
            config,
            format,
        } => commands::analyze::execute(history, config, format),
        Commands::BestHours { history, config } => commands::best_hours::execute(history, config),
        Commands::Recommend {
            progress,
            config,
            format,
            output,
        } => commands::recommend::execute(progress, config, format, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
