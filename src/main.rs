//! langrepo: build a static language repository from word-list spreadsheets

use anyhow::Result;
use clap::{Parser, Subcommand};
use langrepo::config::Config;
use langrepo::pipeline::Pipeline;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "langrepo")]
#[command(about = "Build a static language repository from word-list spreadsheets")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "langrepo.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the repository tree and master indices
    Build {
        /// Input directory (geography sources plus per-language folders)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Output directory; the repository is built under <dist>/repository
        #[arg(long)]
        dist_dir: Option<PathBuf>,

        /// Rebuild media outputs that already exist
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the input tree without writing anything
    Check {
        /// Input directory
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };
    config.apply_env();

    match cli.command {
        Commands::Build {
            data_dir,
            dist_dir,
            force,
        } => {
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }
            if let Some(dist_dir) = dist_dir {
                config.dist_dir = dist_dir;
            }
            if force {
                config.transcode.force_rebuild = true;
            }
            config.validate()?;

            info!("Data directory: {}", config.data_dir.display());
            info!("Dist directory: {}", config.dist_dir.display());

            let summary = Pipeline::new(config).run()?;
            println!(
                "Built {} languages, {} words ({} errors, {} warnings)",
                summary.languages, summary.words, summary.errors, summary.warnings
            );
            Ok(())
        }
        Commands::Check { data_dir } => {
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }
            config.validate()?;

            let issues = Pipeline::new(config).check()?;
            for issue in issues.iter() {
                println!("[{:?}] {}: {}", issue.level, issue.kind, issue.msg);
            }
            println!(
                "{} errors, {} warnings",
                issues.error_count(),
                issues.warning_count()
            );
            if issues.error_count() > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
