//! Frontdesk command-line interface.

pub mod commands;
pub mod render;
pub mod repl;

use clap::{Parser, Subcommand};
use frontdesk_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Frontdesk - virtual dental receptionist
#[derive(Parser)]
#[command(name = "frontdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "FRONTDESK_CONFIG", global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve(commands::serve::ServeArgs),

    /// Chat with the receptionist in the terminal
    Chat(commands::chat::ChatArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Serve(args) => commands::serve::run(args, config_path).await,
        Commands::Chat(args) => commands::chat::run(args, config_path).await,
        Commands::Config(args) => commands::config::run(args, config_path).await,
        Commands::Version => {
            println!("frontdesk {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over everything. Otherwise the level comes from `-v`
/// or the config file, and the format from the config file.
pub fn init_logging(cli: &Cli) {
    let logging = commands::load_config(cli.config.as_deref())
        .map(|config| config.logging)
        .unwrap_or_default();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(cli.verbose, &logging)));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

fn default_directive(verbose: u8, logging: &LoggingConfig) -> String {
    match verbose {
        0 => format!("frontdesk={}", logging.level.as_str()),
        1 => "frontdesk=debug,tower_http=debug".to_string(),
        _ => "frontdesk=trace,tower_http=trace".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use frontdesk_core::config::LogLevel;

    #[test]
    fn test_parse_version() {
        let cli = Cli::try_parse_from(["frontdesk", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from([
            "frontdesk",
            "serve",
            "--port",
            "8080",
            "--bind",
            "lan",
            "--provider",
            "scripted",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.bind.as_deref(), Some("lan"));
                assert_eq!(args.provider.as_deref(), Some("scripted"));
                assert!(args.model.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_parse_serve_rejects_unknown_bind() {
        assert!(Cli::try_parse_from(["frontdesk", "serve", "--bind", "tailnet"]).is_err());
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from(["frontdesk", "config", "set", "gateway.port", "9090"]).unwrap();
        match cli.command {
            Commands::Config(args) => match args.command {
                commands::config::ConfigCommand::Set { key, value } => {
                    assert_eq!(key, "gateway.port");
                    assert_eq!(value, "9090");
                }
                _ => panic!("Expected Config Set command"),
            },
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "frontdesk",
            "config",
            "show",
            "-vv",
            "--config",
            "/tmp/frontdesk.json5",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.unwrap().to_str(), Some("/tmp/frontdesk.json5"));
    }

    #[test]
    fn test_parse_chat_session() {
        let cli = Cli::try_parse_from(["frontdesk", "chat", "--session", "abc"]).unwrap();
        match cli.command {
            Commands::Chat(args) => assert_eq!(args.session.as_deref(), Some("abc")),
            _ => panic!("Expected Chat command"),
        }
    }

    #[test]
    fn test_default_directive() {
        let logging = LoggingConfig {
            level: LogLevel::Warn,
            ..Default::default()
        };
        assert_eq!(default_directive(0, &logging), "frontdesk=warn");
        assert!(default_directive(1, &logging).starts_with("frontdesk=debug"));
        assert!(default_directive(3, &logging).starts_with("frontdesk=trace"));
    }
}
