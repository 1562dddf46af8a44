//! arbor CLI - Compile adjacency-list tables to hierarchical SQL
//!
//! Usage:
//!   arbor compile [arbor.toml] --table <name> [--dialect <dialect>] [--server-version <x.y.z>]
//!   arbor dialects
//!   arbor tables [arbor.toml]
//!
//! Examples:
//!   arbor compile arbor.toml --table dummy_hierarchy --dialect postgresql --server-version 16.2
//!   arbor compile arbor.toml --table dummy_hierarchy --dialect oracle --server-version 19 --starting-node 4
//!   arbor compile --table dummy_hierarchy --columns id,parent_id --output json

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use arbor::config::{Settings, SettingsError};
use arbor::hierarchy::{
    compile, BaseQuery, HierarchyOptions, HierarchyRequest, HierarchySql, Version, CAPABILITIES,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "arbor - Compile adjacency-list tables to dialect-specific hierarchical SQL")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a hierarchical query for one table
    Compile {
        /// Path to the config file (defaults to $ARBOR_CONFIG or ./arbor.toml)
        config: Option<PathBuf>,

        /// Table to traverse
        #[arg(short, long)]
        table: String,

        /// Dialect name (falls back to [target] in the config file)
        #[arg(short, long)]
        dialect: Option<String>,

        /// Server version, major[.minor[.patch]] (falls back to [target])
        #[arg(long)]
        server_version: Option<Version>,

        /// Parent value whose children start the traversal
        #[arg(short, long, conflicts_with = "no_starting_node")]
        starting_node: Option<String>,

        /// Start a traversal from every row
        #[arg(long)]
        no_starting_node: bool,

        /// Separator for CONNECT BY path strings
        #[arg(long)]
        separator: Option<String>,

        /// Comma-separated projection (defaults to every column)
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,
    },

    /// List supported dialects and their minimum versions
    Dialects,

    /// List tables in a config file
    Tables {
        /// Path to the config file (defaults to $ARBOR_CONFIG or ./arbor.toml)
        config: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Output SQL only
    Sql,
    /// Output SQL with a comment header listing bind parameters
    Verbose,
    /// Output the compiled statement as JSON
    Json,
}

fn main() -> ExitCode {
    env_logger::builder().format_timestamp(None).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            config,
            table,
            dialect,
            server_version,
            starting_node,
            no_starting_node,
            separator,
            columns,
            output,
        } => {
            let mut options = HierarchyOptions::default();
            if let Some(value) = starting_node {
                options = options.starting_node(value);
            }
            if no_starting_node {
                options = options.disable_starting_node();
            }
            if let Some(separator) = separator {
                options = options.path_separator(separator);
            }
            cmd_compile(
                config.as_deref(),
                &table,
                dialect,
                server_version,
                columns,
                options,
                output,
            )
        }
        Commands::Dialects => cmd_dialects(),
        Commands::Tables { config } => cmd_tables(config.as_deref()),
    }
}

fn load_settings(config: Option<&Path>) -> Result<Settings, SettingsError> {
    match config {
        Some(path) => Settings::load(path),
        None => Settings::discover(),
    }
}

fn cmd_compile(
    config: Option<&Path>,
    table: &str,
    dialect: Option<String>,
    version: Option<Version>,
    columns: Vec<String>,
    options: HierarchyOptions,
    output: OutputFormat,
) -> ExitCode {
    let settings = match load_settings(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let descriptor = match settings.find_table(table) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Command-line target wins over [target]
    let target = settings.target.as_ref();
    let dialect = match dialect.map(Ok).or_else(|| target.map(|t| t.resolved_dialect())) {
        Some(Ok(d)) => d,
        Some(Err(e)) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
        None => {
            eprintln!("No dialect given: pass --dialect or set [target] in the config file");
            return ExitCode::FAILURE;
        }
    };
    let version = match version.map(Ok).or_else(|| target.map(|t| t.resolved_version())) {
        Some(Ok(v)) => v,
        Some(Err(e)) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
        None => {
            eprintln!("No server version given: pass --server-version or set [target] in the config file");
            return ExitCode::FAILURE;
        }
    };

    let mut base = BaseQuery::new(&descriptor);
    if !columns.is_empty() {
        base = base.columns(columns);
    }

    let result = HierarchyRequest::new(&descriptor, base, options)
        .and_then(|request| compile(&request, &dialect, version));

    match result {
        Ok(compiled) => {
            print_compiled(&compiled, output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_compiled(compiled: &HierarchySql, output: OutputFormat) {
    match output {
        OutputFormat::Sql => {
            println!("{}", compiled.sql);
        }
        OutputFormat::Verbose => {
            println!("-- arbor hierarchical query");
            println!("-- Dialect: {}", compiled.dialect);
            println!(
                "-- Columns: {}",
                compiled.column_names().collect::<Vec<_>>().join(", ")
            );
            for (i, param) in compiled.params.iter().enumerate() {
                println!("-- Param {}: {:?}", i + 1, param);
            }
            println!();
            println!("{}", compiled.sql);
        }
        OutputFormat::Json => match serde_json::to_string_pretty(compiled) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Serialization error: {}", e),
        },
    }
}

fn cmd_dialects() -> ExitCode {
    println!("{:<12} MIN VERSION", "DIALECT");
    for capability in CAPABILITIES {
        println!("{:<12} {}", capability.name, capability.min_version);
    }
    ExitCode::SUCCESS
}

fn cmd_tables(config: Option<&Path>) -> ExitCode {
    let settings = match load_settings(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for name in settings.table_names() {
        match settings.find_table(name) {
            Ok(table) => {
                let self_ref = arbor::hierarchy::resolve_self_reference(&table)
                    .map(|fk| format!("{} -> {}", fk.parent, fk.child))
                    .unwrap_or_else(|_| "no self-reference".to_string());
                println!("{} ({} columns, {})", name, table.columns.len(), self_ref);
            }
            Err(e) => println!("{} (invalid: {})", name, e),
        }
    }
    ExitCode::SUCCESS
}
