use clap::{Parser, Subcommand};
use std::sync::Arc;

use ultrabot::application::dispatcher::Dispatcher;
use ultrabot::domain::traits::ChatService;
use ultrabot::infrastructure::adapters::slack::SlackAdapter;
use ultrabot::infrastructure::config::Config;
use ultrabot::infrastructure::plugins::{HandlerSet, PluginLoader};

#[derive(Parser)]
#[command(name = "ultrabot")]
#[command(about = "A Slack bot with dynamically loaded command plugins", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Slack token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config, cli.token);
        }
        Commands::Version => {
            println!("ultrabot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(config_path: String, token_override: Option<String>) {
    // Load config
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    tracing::info!("Starting bot: {}", config.bot.name);

    let token = match config.resolve_token(token_override) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("No Slack token: {}", e);
            return;
        }
    };

    // Load and activate plugins before touching the network; a bot with a
    // broken plugin directory has nothing to dispatch to.
    let loader = PluginLoader::new(&config.plugins.directory);
    let loaded = match loader.load_all() {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Plugin scan failed: {}", e);
            return;
        }
    };
    let handlers = HandlerSet::new(loaded);
    if handlers.is_empty() {
        tracing::warn!(
            "No plugins activated from {}",
            config.plugins.directory.display()
        );
    }

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let mut slack = SlackAdapter::new(token, config.messages.clone());

        let bot_user = match slack.user_info().await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!("Failed to resolve bot identity: {}", e);
                return;
            }
        };
        tracing::info!("Authenticated as {}", bot_user.id());

        let events = match slack.listen().await {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Failed to open event stream: {}", e);
                return;
            }
        };

        let dispatcher = Dispatcher::new(handlers);
        dispatcher.run(events, Arc::new(slack), bot_user).await;
    });
}

fn init_config() {
    let config = Config::default();
    match config.to_yaml() {
        Ok(yaml) => {
            if std::path::Path::new("config.yaml").exists() {
                tracing::error!("config.yaml already exists, not overwriting");
                return;
            }
            match std::fs::write("config.yaml", yaml) {
                Ok(()) => println!("Wrote config.yaml"),
                Err(e) => tracing::error!("Failed to write config.yaml: {}", e),
            }
        }
        Err(e) => tracing::error!("Failed to render config: {}", e),
    }
}
