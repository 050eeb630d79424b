pub mod config;
pub mod error;
pub mod exists;
pub mod maven;
pub mod repo;
pub mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use crate::config::ExistsConfig;
use crate::exists::verify_artifact;
use crate::util::checksum::{ChecksumAlgorithm, CheckSum};

/// Checks whether an artifact identical to the one just built is already in a Maven repository,
///  so that installing or deploying it can be skipped.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// more logging: -v for DEBUG, -vv for TRACE (RUST_LOG takes precedence)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// less logging: -q for WARN, -qq for ERROR
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    quiet: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify an artifact and print the resulting properties as name=value lines
    Verify {
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// groupId:artifactId[:type]:version
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        repository: Option<String>,
        #[arg(long)]
        snapshot_repository: Option<String>,
        #[arg(long)]
        compare_checksum: bool,
        #[arg(long)]
        fail_if_exists: bool,
        #[arg(long)]
        fail_if_not_exists: bool,
    },
    /// Write a checksum file next to each of the given files
    Checksum {
        #[arg(short, long, value_enum, default_value_t = ChecksumAlgorithm::Sha1)]
        algorithm: ChecksumAlgorithm,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn init_logging(verbose: u8, quiet: u8) {
    let level = match (quiet, verbose) {
        (0, 0) => LevelFilter::INFO,
        (0, 1) => LevelFilter::DEBUG,
        (0, _) => LevelFilter::TRACE,
        (1, _) => LevelFilter::WARN,
        (_, _) => LevelFilter::ERROR,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Verify { config, project, repository, snapshot_repository, compare_checksum, fail_if_exists, fail_if_not_exists } => {
            let mut config = match config {
                Some(path) => ExistsConfig::load(&path).await?,
                None => ExistsConfig::default(),
            };
            if let Some(project) = project {
                config.project = project;
            }
            if repository.is_some() {
                config.repository = repository;
            }
            if snapshot_repository.is_some() {
                config.snapshot_repository = snapshot_repository;
            }
            config.compare_checksum |= compare_checksum;
            config.fail_if_exists |= fail_if_exists;
            config.fail_if_not_exists |= fail_if_not_exists;

            let verification = verify_artifact(&config).await?;
            for (name, value) in verification.properties(config.property_name(), config.snapshot_time_property.as_deref()) {
                info!("setting {}={}", name, value);
                println!("{}={}", name, value);
            }
            Ok(())
        }
        Command::Checksum { algorithm, files } => {
            let check_sum = CheckSum::new(algorithm);
            for file in files {
                let sidecar = check_sum.write_checksum(&file).await?;
                info!("wrote {}", sidecar.display());
            }
            Ok(())
        }
    }
}
