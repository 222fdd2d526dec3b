use clap::Parser;
use hospitaldb::config::{self, Config};
use hospitaldb::console::StdConsole;
use hospitaldb::exercises::ExerciseRunner;
use hospitaldb::results_grid::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "hospitaldb",
    about = "Walk through hospital/doctor queries against a SQLite database"
)]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database file (default: HospitalInfo.db).
    #[arg(short, long, value_name = "PATH", env = "HOSPITALDB_DATABASE")]
    database: Option<PathBuf>,

    /// Result format: table, csv, json or markdown.
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<OutputFormat>,
}

fn resolve(args: &Args) -> hospitaldb::core::Result<Config> {
    let mut config = config::resolve_config(args.config.as_deref())?;
    if let Some(path) = &args.database {
        config.database.path = path.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    Ok(config)
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout only carries the exercise output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match resolve(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Starting hospitaldb with database {:?}, {} output",
        config.database.path, config.output.format
    );

    let mut console = StdConsole;
    let mut runner = ExerciseRunner::new(&mut console, &config);
    match runner.run(&config.database.path) {
        Ok(state) => {
            info!(?state, "run finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("run aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
