//! Interactive console driving the dashboard actions.

use crate::console_helper::ConsoleHelper;
use anyhow::{anyhow, bail, Result};
use sierpinski_dashboard::{ActionOutcome, Dashboard};
use std::future::Future;
use std::str::FromStr;
use tokio::runtime::Handle;
use tracing::debug;

pub const PROMPT: &str = "sierpinski";

const HELP: &[(&str, &str)] = &[
    ("mine", "Start or stop mining"),
    ("reset", "Reset the mining statistics"),
    ("token create", "Create the token"),
    ("token refresh", "Reload the token"),
    ("wallet create", "Create a new wallet"),
    ("balance", "Reload the wallet balance"),
    ("transfer <to> <amount>", "Send tokens from the current wallet"),
    ("peer add [url]", "Register a peer, prompting for the url if omitted"),
    ("help", "Show this list"),
    ("exit | quit", "Leave the dashboard"),
];

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Mine,
    Reset,
    TokenCreate,
    TokenRefresh,
    WalletCreate,
    Balance,
    Transfer { to: String, amount: String },
    PeerAdd(Option<String>),
    Help,
    Exit,
}

impl FromStr for ShellCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let lowered: Vec<String> = words.iter().map(|w| w.to_ascii_lowercase()).collect();
        let keywords: Vec<&str> = lowered.iter().map(String::as_str).collect();

        let command = match keywords.as_slice() {
            ["mine"] => ShellCommand::Mine,
            ["reset"] => ShellCommand::Reset,
            ["token", "create"] => ShellCommand::TokenCreate,
            ["token", "refresh"] => ShellCommand::TokenRefresh,
            ["wallet", "create"] => ShellCommand::WalletCreate,
            ["balance"] => ShellCommand::Balance,
            ["transfer", _, _] => ShellCommand::Transfer {
                to: words[1].to_string(),
                amount: words[2].to_string(),
            },
            ["transfer", ..] => bail!("usage: transfer <to> <amount>"),
            ["peer", "add"] => ShellCommand::PeerAdd(None),
            ["peer", "add", _] => ShellCommand::PeerAdd(Some(words[2].to_string())),
            ["help"] => ShellCommand::Help,
            ["exit"] | ["quit"] => ShellCommand::Exit,
            [] => bail!("empty command"),
            _ => bail!("unknown command '{}', type `help` for the list", line.trim()),
        };
        Ok(command)
    }
}

/// Reads console lines and runs them against a [`Dashboard`].
///
/// Runs on a blocking thread; async actions are driven through the runtime
/// handle.
pub struct CommandLine {
    dashboard: Dashboard,
    runtime: Handle,
}

impl CommandLine {
    pub fn new(dashboard: Dashboard, runtime: Handle) -> Self {
        Self { dashboard, runtime }
    }

    pub fn run_shell(&self) -> Result<()> {
        loop {
            let line = ConsoleHelper::read_user_input(PROMPT)?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match trimmed.parse::<ShellCommand>() {
                Ok(ShellCommand::Exit) => break,
                Ok(command) => {
                    if let Err(err) = self.execute(command) {
                        ConsoleHelper::error(err.to_string());
                    }
                }
                Err(err) => ConsoleHelper::error(err.to_string()),
            }
        }
        Ok(())
    }

    pub fn execute(&self, command: ShellCommand) -> Result<()> {
        debug!(target: "sierpinski", ?command, "console command");
        match command {
            ShellCommand::Mine => {
                let mining = self.block_on(self.dashboard.toggle_mining());
                ConsoleHelper::info(["Mining: ", if mining { "on" } else { "off" }]);
                Ok(())
            }
            ShellCommand::Reset => {
                self.block_on(self.dashboard.reset_mining());
                ConsoleHelper::info(["Mining statistics reset"]);
                Ok(())
            }
            ShellCommand::TokenCreate => {
                let outcome = self.block_on(self.dashboard.create_token());
                report("token create", outcome)
            }
            ShellCommand::TokenRefresh => {
                let outcome = self.block_on(self.dashboard.fetch_token());
                report("token refresh", outcome)
            }
            ShellCommand::WalletCreate => {
                let outcome = self.block_on(self.dashboard.create_wallet());
                report("wallet create", outcome)
            }
            ShellCommand::Balance => {
                let outcome = self.block_on(self.dashboard.refresh_balance());
                if outcome == ActionOutcome::Skipped {
                    bail!("no wallet, run `wallet create` first");
                }
                report("balance", outcome)
            }
            ShellCommand::Transfer { to, amount } => {
                let outcome = self.block_on(async {
                    self.dashboard.set_transfer_form(to, amount).await;
                    self.dashboard.transfer().await
                });
                report("transfer", outcome)
            }
            ShellCommand::PeerAdd(url) => {
                let url = match url {
                    Some(url) => url,
                    None => ConsoleHelper::prompt("Enter peer URL (e.g., ws://localhost:8765)")?,
                };
                if url.is_empty() {
                    return Ok(());
                }
                let outcome = self.block_on(self.dashboard.add_peer(&url));
                report("peer add", outcome)
            }
            ShellCommand::Help => {
                for (usage, description) in HELP {
                    ConsoleHelper::info([format!("{usage:<24}"), description.to_string()]);
                }
                Ok(())
            }
            ShellCommand::Exit => Ok(()),
        }
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn report(action: &str, outcome: ActionOutcome) -> Result<()> {
    match outcome {
        ActionOutcome::Done => {
            ConsoleHelper::info([action, ": done"]);
            Ok(())
        }
        ActionOutcome::Failed(message) => Err(anyhow!(message)),
        ActionOutcome::Skipped => {
            ConsoleHelper::warning(format!("{action} skipped: busy or incomplete"));
            Ok(())
        }
    }
}
