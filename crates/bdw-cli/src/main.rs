use bdw_engine::{default_registry, run_pipeline, PipelineSpec};
use bdw_sdk::WriterError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bdw")]
#[command(about = "Buffered data writer - stream JSONL records into rotating output files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the configured source into rotating files
    Run {
        /// Path to pipeline YAML file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a pipeline configuration
    Validate {
        /// Path to pipeline YAML file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List available file formats
    Formats,
    /// Show version information
    Version,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let registry = default_registry();

    match cli.command {
        Commands::Run { config } => {
            let spec = PipelineSpec::from_yaml_file(&config)?;
            let summary = run_pipeline(&spec, &registry)?;
            for file in &summary.files {
                println!("{}", file.display());
            }
            println!(
                "✓ Wrote {} records into {} files",
                summary.total_records,
                summary.files.len()
            );
            if let Some(manifest) = summary.manifest_path {
                println!("✓ Manifest written to: {}", manifest.display());
            }
        }
        Commands::Validate { config } => {
            let spec = PipelineSpec::from_yaml_file(&config)?;
            spec.validate(&registry)?;
            println!("✓ Pipeline configuration is valid");
        }
        Commands::Formats => {
            for name in registry.names() {
                let spec = registry.get(name)?.spec();
                println!(
                    "{:<14} .{:<14} binary={:<5} schema_changes={}",
                    name, spec.file_extension, spec.is_binary_format, spec.supports_schema_changes
                );
            }
        }
        Commands::Version => {
            println!("bdw version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let is_config = err
                .downcast_ref::<WriterError>()
                .is_some_and(WriterError::is_config_error);
            if is_config {
                eprintln!("Configuration error: {:#}", err);
                ExitCode::from(2)
            } else {
                eprintln!("Error: {:#}", err);
                ExitCode::FAILURE
            }
        }
    }
}
