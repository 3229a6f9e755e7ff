use clap::Parser;
use schemascope::{config, server};

/// Schemascope - A schema graph explorer for PostgreSQL
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// HTTP server host address
    #[arg(long, default_value = "0.0.0.0")]
    http_host: String,

    /// HTTP server port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// PostgreSQL schema to introspect
    #[arg(long, default_value = "public")]
    db_schema: String,

    /// Directory containing the frontend build to serve
    #[arg(long, default_value = "build")]
    static_dir: String,
}

impl From<Cli> for config::CliConfig {
    fn from(cli: Cli) -> Self {
        config::CliConfig {
            http_host: cli.http_host,
            http_port: cli.http_port,
            db_schema: cli.db_schema,
            static_dir: cli.static_dir,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    println!("\nSchemascope v{}\n", env!("CARGO_PKG_VERSION"));

    // Create configuration from CLI args
    let cli_config: config::CliConfig = cli.into();
    let config = match config::ServerConfig::from_cli(cli_config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    server::run_with_config(config).await;
}
