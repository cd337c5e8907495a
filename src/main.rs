mod categorizer;
mod cli;
mod db;
mod error;
mod fmt;
mod ingest;
mod matching;
mod models;
mod prompt;
mod resolver;
mod rules;
mod settings;
mod sources;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Import { file, bank } => cli::import::run(&file, &bank),
        Commands::Invoices { file } => cli::invoices::run(&file),
        Commands::Match => cli::matching::run(),
        Commands::Undo => cli::matching::undo(),
        Commands::Companies => cli::companies::run(),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
