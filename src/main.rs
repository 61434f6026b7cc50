use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use retire_sim::api::{ParamError, ProjectionArgs, build_params, run_http_server};
use retire_sim::core::simulate;
use retire_sim::report::{
    ChartData, ExportError, display_rows, render_table, write_csv, write_svg,
};

#[derive(Parser, Debug)]
#[command(
    name = "retire-sim",
    about = "Retirement savings and dividend reinvestment projection (4% rule)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project year by year and print the table
    Run {
        #[command(flatten)]
        projection: ProjectionArgs,
        #[arg(long, help = "Write the raw yearly records as CSV to this path")]
        csv: Option<PathBuf>,
        #[arg(long, help = "Write the asset/withdrawal bar chart as SVG to this path")]
        svg: Option<PathBuf>,
    },
    /// Serve the calculator page and JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Params(#[from] ParamError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run {
            projection,
            csv,
            svg,
        } => run(&projection, csv, svg),
        Command::Serve { port } => run_http_server(port).await.map_err(CliError::from),
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(
    projection: &ProjectionArgs,
    csv: Option<PathBuf>,
    svg: Option<PathBuf>,
) -> Result<(), CliError> {
    let params = build_params(projection)?;
    let records = simulate(&params);
    tracing::debug!(years = records.len(), "projection complete");

    print!("{}", render_table(&display_rows(&records)));

    if let Some(path) = csv {
        write_csv(&path, &records)?;
    }
    if let Some(path) = svg {
        write_svg(&path, &ChartData::from_records(&records))?;
    }
    Ok(())
}
