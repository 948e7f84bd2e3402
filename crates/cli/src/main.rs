use std::sync::Arc;

use {
    async_trait::async_trait,
    clap::Parser,
    tracing::{error, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    botbridge_channels::{ChannelRegistry, HostSink, Identity, Message},
    botbridge_connector::{AppCredentials, Bridge, TokenManager},
    botbridge_gateway::AppState,
};

#[derive(Parser)]
#[command(name = "botbridge", about = "botbridge — Bot Framework Connector webhook bridge")]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides config value).
    #[arg(long)]
    port: Option<u16>,

    /// Config file path (overrides discovery).
    #[arg(long, env = "BOTBRIDGE_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Reply to every inbound message with its own body (loopback test).
    #[arg(long, default_value_t = false)]
    echo: bool,
}

/// Default host sink: log inbound messages and leave routing to a real host.
struct LogSink;

#[async_trait]
impl HostSink for LogSink {
    async fn on_message(&self, message: Message) {
        info!(from = %message.from, body = message.body, "inbound message");
    }

    async fn on_connect(&self) {
        info!("bridge connected");
    }

    async fn on_disconnect(&self) {
        info!("bridge disconnected");
    }
}

/// Loopback sink for end-to-end smoke testing against the emulator.
struct EchoSink {
    bridge: Arc<Bridge>,
}

#[async_trait]
impl HostSink for EchoSink {
    async fn on_message(&self, message: Message) {
        let reply = message.reply_with(message.body.clone());
        if let Err(e) = self.bridge.send_message(reply).await {
            error!(error = %e, "echo reply failed");
        }
    }

    async fn on_connect(&self) {
        info!("bridge connected (echo mode)");
    }

    async fn on_disconnect(&self) {
        info!("bridge disconnected");
    }
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = match &cli.config {
        Some(path) => botbridge_config::load_config(path)?,
        None => botbridge_config::discover_and_load(),
    };

    let credentials = config
        .identity
        .credentials()
        .map(|(app_id, app_password)| AppCredentials::new(app_id, app_password));
    if credentials.is_none() {
        info!("no app credentials configured, running in emulator mode");
    }
    let tokens = Arc::new(
        TokenManager::new(credentials)
            .with_tenant(&config.identity.oauth_tenant)
            .with_scope(config.identity.oauth_scope.clone()),
    );

    let registry = Arc::new(ChannelRegistry::new());
    registry.seed(config.channels.iter().map(|(channel_id, seed)| {
        (
            channel_id.clone(),
            seed.service_url.clone(),
            Identity::new(seed.bot_id.as_str(), seed.bot_name.as_str()),
        )
    }));
    if !config.channels.is_empty() {
        info!(channels = ?registry.channel_ids(), "seeded channels from config");
    }

    let bridge = Arc::new(Bridge::new(Arc::clone(&registry), tokens));
    let sink: Arc<dyn HostSink> = if cli.echo {
        Arc::new(EchoSink {
            bridge: Arc::clone(&bridge),
        })
    } else {
        Arc::new(LogSink)
    };

    let bind = cli.bind.unwrap_or(config.server.bind);
    let port = cli.port.unwrap_or(config.server.port);

    let state = AppState::new(registry, bridge, sink);
    botbridge_gateway::start(&bind, port, state).await
}
