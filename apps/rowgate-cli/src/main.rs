use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

use error::CliResult;

#[derive(Parser)]
#[command(name = "rowgate")]
#[command(about = "Rowgate CLI - Validate CSV uploads against a column schema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a CSV file and display the accepted rows
    Validate {
        /// CSV file to upload
        file: PathBuf,

        /// Schema file (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Page to display (zero-based)
        #[arg(short, long, default_value = "0")]
        page: usize,

        /// Rows per page (5 or 10)
        #[arg(long, default_value = "5", value_parser = commands::display::parse_page_size)]
        page_size: usize,

        /// Write accepted rows to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display rows accepted by an earlier upload
    Show {
        /// Schema file (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// JSON file written by `validate --output`
        #[arg(long)]
        previous: PathBuf,

        /// Page to display (zero-based)
        #[arg(short, long, default_value = "0")]
        page: usize,

        /// Rows per page (5 or 10)
        #[arg(long, default_value = "5", value_parser = commands::display::parse_page_size)]
        page_size: usize,
    },

    /// Write template.csv containing the schema's header line
    Template {
        /// Schema file (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Directory to write template.csv into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            file,
            schema,
            page,
            page_size,
            output,
        } => commands::validate::execute(file, schema, page, page_size, output),

        Commands::Show {
            schema,
            previous,
            page,
            page_size,
        } => commands::show::execute(schema, previous, page, page_size),

        Commands::Template { schema, output_dir } => {
            commands::template::execute(schema, output_dir)
        }
    }
}
