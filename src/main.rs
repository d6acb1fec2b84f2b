//! Taskmate CLI - a server-rendered task tracker.

use clap::Parser;
use std::process;
use taskmate::cli::{CatalogCommands, Cli, Commands, ConfigCommands, UserCommands};
use taskmate::commands::{self, Output};
use taskmate::config::{self, ConfigOverrides, ResolvedConfig};
use taskmate::{logging, web};

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    let mut overrides = ConfigOverrides::new();
    if let Some(database) = cli.database.clone() {
        overrides = overrides.with_database(database);
    }
    if let Commands::Serve { host, port } = &cli.command {
        if let Some(host) = host {
            overrides = overrides.with_host(host.clone());
        }
        if let Some(port) = port {
            overrides = overrides.with_port(*port);
        }
    }

    let result = config::resolve(cli.config.as_deref(), &overrides).and_then(|config| {
        logging::init(&config.log_level.value);
        run_command(cli.command, &config, human)
    });

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

fn run_command(
    command: Commands,
    config: &ResolvedConfig,
    human: bool,
) -> Result<(), taskmate::Error> {
    let database = config.database_path();
    match command {
        Commands::Init => output(&commands::init(database)?, human),
        Commands::Serve { .. } => return serve(config),
        Commands::User { command } => match command {
            UserCommands::Create(args) => {
                let min_length = config.password_min_length.value as usize;
                let result = commands::user_create(
                    database,
                    &args.username,
                    &args.first_name,
                    &args.last_name,
                    &args.password,
                    min_length,
                )?;
                output(&result, human)
            }
            UserCommands::List => output(&commands::user_list(database)?, human),
        },
        Commands::Status { command } => match command {
            CatalogCommands::Create { name } => {
                output(&commands::status_create(database, &name)?, human)
            }
            CatalogCommands::List => output(&commands::status_list(database)?, human),
        },
        Commands::Label { command } => match command {
            CatalogCommands::Create { name } => {
                output(&commands::label_create(database, &name)?, human)
            }
            CatalogCommands::List => output(&commands::label_list(database)?, human),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => output(&commands::config_show(config), human),
        },
    }
    Ok(())
}

/// Run the web server until Ctrl+C.
fn serve(config: &ResolvedConfig) -> Result<(), taskmate::Error> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| taskmate::Error::Other(format!("Failed to create runtime: {}", e)))?
        .block_on(web::start_server(config))
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
