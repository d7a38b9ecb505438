mod channel_commands;
mod lead_commands;
mod notify_commands;
mod output;

use {
    anyhow::Result,
    clap::{Parser, Subcommand},
    leadflow_config::LeadflowConfig,
    std::path::PathBuf,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "leadflow", about = "leadflow: lead notifications and integration utilities", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (TOML or JSON). Defaults to ./leadflow.toml, then the user config dir.
    #[arg(long, global = true, env = "LEADFLOW_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the utility server (default when no subcommand is provided).
    Serve {
        /// Address to bind to (overrides config value).
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides config value).
        #[arg(long)]
        port: Option<u16>,
        /// Serve `/metrics` without recording anything.
        #[arg(long, default_value_t = false)]
        no_metrics: bool,
    },
    /// Inspect and check the configured channels.
    Channels {
        #[command(subcommand)]
        action: channel_commands::ChannelAction,
    },
    /// Dispatch one event to every channel.
    Notify {
        #[command(subcommand)]
        event: notify_commands::NotifyEvent,
    },
    /// Send a direct bot message to a chat.
    Send(lead_commands::SendArgs),
    /// List the built-in message templates.
    Templates,
    /// Generate simulated leads and announce them, once or on a monitoring interval.
    Simulate(lead_commands::SimulateArgs),
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> Result<LeadflowConfig> {
    Ok(leadflow_config::load(cli.config.as_deref())?)
}

#[cfg_attr(not(feature = "metrics"), allow(unused_variables))]
async fn serve(
    mut config: LeadflowConfig,
    bind: Option<String>,
    port: Option<u16>,
    no_metrics: bool,
) -> Result<()> {
    if let Some(bind) = bind {
        config.server.set_bind(&bind);
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let state = leadflow_gateway::UtilsState::from_config(&config.server);

    #[cfg(feature = "metrics")]
    let state = {
        let handle = leadflow_metrics::init_metrics(leadflow_metrics::MetricsRecorderConfig {
            enabled: !no_metrics,
            global_labels: vec![("service".into(), "leadflow".into())],
        })?;
        state.with_metrics(handle)
    };

    leadflow_gateway::start(&config.server.bind, config.server.port, state).await
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "leadflow starting");
    let config = load_config(&cli)?;

    match cli.command {
        None => serve(config, None, None, false).await,
        Some(Commands::Serve {
            bind,
            port,
            no_metrics,
        }) => serve(config, bind, port, no_metrics).await,
        Some(Commands::Channels { action }) => channel_commands::handle_channels(&config, action).await,
        Some(Commands::Notify { event }) => notify_commands::handle_notify(&config, event).await,
        Some(Commands::Send(args)) => lead_commands::handle_send(&config, args).await,
        Some(Commands::Templates) => {
            lead_commands::print_templates();
            Ok(())
        },
        Some(Commands::Simulate(args)) => lead_commands::handle_simulate(&config, args).await,
    }
}
