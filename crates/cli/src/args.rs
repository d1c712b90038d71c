use clap::{Parser, Subcommand, ValueEnum};
use sierpinski_config::API_URL_ENV;
use sierpinski_dashboard::TickerSource;
use std::path::PathBuf;

/// Command-line arguments for the Sierpinski client
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sierpinski",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sierpinski CLI - terminal dashboard for the Sierpinski Triangle Blockchain",
    long_about = "Sierpinski CLI polls a Sierpinski Triangle Blockchain backend and shows its token, wallet, mining, peer and ledger state. Run without a subcommand for the live dashboard, or use the one-shot commands to print single API responses as JSON."
)]
pub struct CliArgs {
    /// Specifies the config file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        default_value = "sierpinski.toml"
    )]
    pub config: PathBuf,

    /// Backend base URL, overriding the config file
    #[arg(long = "api-url", value_name = "URL", env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// The verbose log level; RUST_LOG takes precedence
    #[arg(long = "verbose", value_enum, value_name = "LEVEL")]
    pub verbose: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl CliArgs {
    /// The subcommand to run, `dashboard` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Dashboard)
    }
}

/// Top-level subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Live dashboard with an interactive console (default)
    Dashboard,

    /// Token supply and mining figures on a timer
    Ticker {
        /// Which endpoints feed the token slot
        #[arg(long, value_name = "SOURCE", default_value_t = TickerSource::Tokenomics)]
        source: TickerSource,
    },

    /// Token commands
    #[command(subcommand)]
    Token(TokenCommand),

    /// Print the mining statistics
    Stats,

    /// Peer commands
    #[command(subcommand)]
    Peers(PeersCommand),

    /// Print the chain validation result
    Chain,

    /// Wallet commands
    #[command(subcommand)]
    Wallet(WalletCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TokenCommand {
    /// Print the token
    Show,
    /// Create the token
    Create {
        /// Initial supply, defaults to `[token].initial_supply`
        #[arg(long, value_name = "N")]
        supply: Option<u64>,
        /// Owner address, defaults to `[token].owner_address`
        #[arg(long, value_name = "ADDR")]
        owner: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PeersCommand {
    /// List known peers
    List,
    /// Register a peer
    Add {
        /// Peer URL, e.g. ws://localhost:8765
        url: String,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum WalletCommand {
    /// Create a new wallet and print its keys
    Create,
    /// Print the balance of an address
    Balance { address: String },
    /// Print the transaction history of an address
    History { address: String },
    /// Send tokens
    Transfer {
        #[arg(long, value_name = "ADDR")]
        from: String,
        #[arg(long, value_name = "ADDR")]
        to: String,
        #[arg(long, value_name = "N", allow_negative_numbers = true)]
        amount: i64,
        #[arg(long = "private-key", value_name = "KEY")]
        private_key: String,
    },
}

/// Log level enumeration
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Trace level logging
    Trace,
    /// Debug level logging
    Debug,
    /// Info level logging
    Info,
    /// Warning level logging
    Warn,
    /// Error level logging
    Error,
}

impl LogLevel {
    /// Directive name understood by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_default() {
        let args = CliArgs::parse_from(["sierpinski"]);
        assert_eq!(args.config, PathBuf::from("sierpinski.toml"));
        assert_eq!(args.verbose, None);
        assert_eq!(args.command, None);
        assert_eq!(args.command(), Command::Dashboard);
    }

    #[test]
    fn test_cli_args_with_options() {
        let args = CliArgs::parse_from([
            "sierpinski",
            "--config",
            "local.toml",
            "--api-url",
            "http://10.0.0.2:8001",
            "--verbose",
            "debug",
            "ticker",
            "--source",
            "token",
        ]);

        assert_eq!(args.config, PathBuf::from("local.toml"));
        assert_eq!(args.api_url.as_deref(), Some("http://10.0.0.2:8001"));
        assert_eq!(args.verbose, Some(LogLevel::Debug));
        assert_eq!(
            args.command(),
            Command::Ticker {
                source: TickerSource::Token
            }
        );
    }

    #[test]
    fn test_negative_transfer_amount_parses() {
        let args = CliArgs::parse_from([
            "sierpinski",
            "wallet",
            "transfer",
            "--from",
            "a",
            "--to",
            "b",
            "--amount",
            "-5",
            "--private-key",
            "k",
        ]);
        match args.command() {
            Command::Wallet(WalletCommand::Transfer { amount, .. }) => assert_eq!(amount, -5),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
        assert_eq!(tracing::Level::from(LogLevel::Info), tracing::Level::INFO);
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(tracing::Level::from(LogLevel::Error), tracing::Level::ERROR);
        assert_eq!(LogLevel::Warn.as_str(), "warn");
    }
}
