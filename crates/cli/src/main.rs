//! # uplift-cli
//!
//! Command-line interface for scoring batches offline with a model bundle.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use uplift::{load_bundle, Arm, ErrorBody, ScoringConfig, ServiceConfig, UpliftService};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "uplift")]
#[command(about = "Two-model uplift scoring CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a prediction request file
    Predict {
        /// Model bundle (JSON)
        #[arg(short, long)]
        bundle: PathBuf,

        /// Request file with an "instances" array; "-" reads stdin
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Score instances one after another instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// Override the model identifier reported in the response
        #[arg(long)]
        model_id: Option<String>,
    },

    /// Print metadata of a model bundle
    Inspect {
        /// Model bundle (JSON)
        #[arg(short, long)]
        bundle: PathBuf,
    },
}

fn read_input(path: &Path) -> CliResult<Vec<u8>> {
    let mut buf = Vec::new();
    if path == Path::new("-") {
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
    } else {
        let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
        BufReader::new(file)
            .read_to_end(&mut buf)
            .map_err(|e| format!("Failed to read file: {}", e))?;
    }
    Ok(buf)
}

fn write_output<T: serde::Serialize>(value: &T, output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => {
            let file =
                File::create(path).map_err(|e| format!("Failed to create output file: {}", e))?;
            serde_json::to_writer_pretty(file, value)
                .map_err(|e| format!("Failed to write output: {}", e))?;
            println!("Results written to {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| format!("Failed to serialize output: {}", e))?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn run_predict(
    bundle: &Path,
    input: &Path,
    output: Option<&Path>,
    sequential: bool,
    model_id: Option<String>,
) -> CliResult<()> {
    let bundle = load_bundle(bundle).map_err(|e| e.to_string())?;
    let config = ServiceConfig {
        model_id,
        max_batch_size: None,
        scoring: if sequential {
            ScoringConfig::sequential()
        } else {
            ScoringConfig::default()
        },
        ..ServiceConfig::default()
    };
    let service = UpliftService::new(bundle, &config);

    let payload = read_input(input)?;
    match service.predict(&payload) {
        Ok(response) => write_output(&response, output),
        Err(err) => {
            let body = serde_json::to_string_pretty(&ErrorBody::from(&err))
                .unwrap_or_else(|_| err.to_string());
            eprintln!("{}", body);
            Err(format!("{} ({})", err.kind(), err))
        }
    }
}

fn run_inspect(bundle: &Path) -> CliResult<()> {
    let bundle = load_bundle(bundle).map_err(|e| e.to_string())?;
    let service = UpliftService::new(bundle, &ServiceConfig::default());

    println!("Model:    {}", service.model_id());
    println!("Treated:  {}", service.model(Arm::Treated).kind());
    println!("Control:  {}", service.model(Arm::Control).kind());
    println!("Features: {}", service.schema().len());
    for (i, name) in service.schema().names().iter().enumerate() {
        println!("  {:>3}  {}", i, name);
    }
    match service.probe() {
        Ok(()) => println!("Probe:    ok"),
        Err(e) => println!("Probe:    FAILED ({})", e),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Predict {
            bundle,
            input,
            output,
            sequential,
            model_id,
        } => run_predict(&bundle, &input, output.as_deref(), sequential, model_id),
        Commands::Inspect { bundle } => run_inspect(&bundle),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
