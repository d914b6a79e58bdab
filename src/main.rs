use anyhow::Result;
use clap::Parser;
use ilo_exporter::{
    config::{Config, Protocol},
    server,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// iLO host or address (overrides config)
    #[arg(long, env = "ILO_HOST")]
    ilo_host: Option<String>,

    /// iLO port (overrides config)
    #[arg(long, env = "ILO_PORT")]
    ilo_port: Option<u16>,

    /// iLO user (overrides config)
    #[arg(long, env = "ILO_USER")]
    ilo_user: Option<String>,

    /// iLO password (overrides config)
    #[arg(long, env = "ILO_PASSWORD", hide_env_values = true)]
    ilo_password: Option<String>,

    /// Transport: HTTP (Redfish) or LOCAL (hpilo_cli over the management bus)
    #[arg(long, env = "ILO_PROTOCOL")]
    ilo_protocol: Option<String>,

    /// Port to listen on for metrics
    #[arg(short, long, env = "LISTEN_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long, env = "EXPORTER_ADDR")]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting iLO Prometheus Exporter v{}", env!("CARGO_PKG_VERSION"));

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;

    // Override with CLI arguments if provided
    if let Some(host) = args.ilo_host {
        config.ilo.host = host;
    }
    if let Some(port) = args.ilo_port {
        config.ilo.port = port;
    }
    if let Some(user) = args.ilo_user {
        config.ilo.user = user;
    }
    if let Some(password) = args.ilo_password {
        config.ilo.password = secrecy::SecretString::from(password);
    }
    if let Some(protocol) = args.ilo_protocol {
        config.ilo.protocol = protocol.parse::<Protocol>()?;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }

    config.validate()?;

    info!("Configuration loaded successfully");
    info!("iLO host: {} ({})", config.ilo.host, config.ilo.protocol);
    info!(
        "Metrics endpoint: http://{}:{}/metrics",
        config.server.addr, config.server.port
    );

    // Resolve identity and start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
