//! mdlex CLI - query a directory of Markdown notes with SQL

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// mdlex - query the front matter of your Markdown notes with SQL
#[derive(Parser)]
#[command(name = "mdlex")]
#[command(author = "Lalo Morales <lalomorales22@github.com>")]
#[command(version)]
#[command(about = "Load Markdown front matter into SQLite and query it", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// SQLite database file (overrides MDLEX_DB_PATH and the config file)
    #[arg(long, global = true, value_name = "PATH")]
    db_path: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default config file and create the database
    Init,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Analyze, validate and load a directory of documents
    Load {
        /// Directory containing Markdown documents
        dir: PathBuf,
    },

    /// Run a read-only SQL query and print the rows as JSON
    Query {
        /// SQL statement, with ?1, ?2... placeholders for parameters
        sql: String,

        /// Positional parameters, bound as text; prefix with int:, real:, null: or text: to choose the type
        params: Vec<String>,
    },

    /// Show the inferred front matter schema without loading anything
    Schema {
        /// Directory containing Markdown documents
        dir: PathBuf,

        /// Print the schema as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show database statistics
    Stats,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print the config file location
    Path,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mdlex=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mdlex=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let db_path = cli.db_path.as_deref();

    let result = match cli.command {
        Commands::Init => commands::init::run(db_path),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(db_path),
            ConfigCommands::Path => commands::config::path(),
        },
        Commands::Load { dir } => commands::load::run(&dir, db_path),
        Commands::Query { sql, params } => commands::query::run(&sql, &params, db_path),
        Commands::Schema { dir, json } => commands::schema::run(&dir, json),
        Commands::Stats => commands::stats::run(db_path),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
