use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use transit_rs::config::Config;
use transit_rs::server;
use transit_rs::workflow::{DefinitionValidator, ValidationMode, WorkflowEngine, WorkflowLoader};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the workflow HTTP API
    Serve {
        /// Address to bind (overrides TRANSIT_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory of definition files to register at startup
        #[arg(short, long)]
        definitions: Option<PathBuf>,

        /// Accept actions that reference undeclared states
        #[arg(long)]
        permissive: bool,
    },
    /// Check a definition file without starting the server
    Validate {
        /// Path to a .yaml, .yml or .json definition
        #[arg(short, long)]
        file: PathBuf,

        /// Accept actions that reference undeclared states
        #[arg(long)]
        permissive: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();
    // tower-http request spans go through `tracing`; both follow RUST_LOG
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let mut config = Config::from_env()?;

    match args.command {
        Commands::Serve {
            host,
            port,
            definitions,
            permissive,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if definitions.is_some() {
                config.definitions_dir = definitions;
            }
            if permissive {
                config.validation = ValidationMode::Permissive;
            }

            let engine = WorkflowEngine::new(config.validation);
            log::info!("Using {} definition validation", config.validation);

            if let Some(dir) = &config.definitions_dir {
                WorkflowLoader::new().seed(&engine, dir).await?;
            }

            server::serve(engine, config.server.socket_addr()?).await?;
        }
        Commands::Validate { file, permissive } => {
            let mode = if permissive {
                ValidationMode::Permissive
            } else {
                config.validation
            };

            let validator = DefinitionValidator::new(mode);
            let def = WorkflowLoader::new().check_definition(&file, &validator)?;

            println!(
                "{}: workflow '{}' is valid ({} states, {} actions, {} validation)",
                file.display(),
                def.id,
                def.states.len(),
                def.actions.len(),
                mode
            );
        }
    }

    Ok(())
}
