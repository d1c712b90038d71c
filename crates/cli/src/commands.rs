//! One-shot commands: a single API call whose result is printed as JSON.

use crate::args::{Command, PeersCommand, TokenCommand, WalletCommand};
use anyhow::{bail, Result};
use serde_json::{json, Value};
use sierpinski_api_client::{ApiClient, CreateTokenRequest, TransferRequest};
use sierpinski_config::TokenConfig;

/// Runs `command` and returns the response as JSON.
pub async fn run(client: &ApiClient, command: &Command, token: &TokenConfig) -> Result<Value> {
    let value = match command {
        Command::Token(TokenCommand::Show) => serde_json::to_value(client.get_token().await?)?,
        Command::Token(TokenCommand::Create { supply, owner }) => {
            let request = CreateTokenRequest::new(
                supply.unwrap_or(token.initial_supply),
                owner.clone().unwrap_or_else(|| token.owner_address.clone()),
            );
            serde_json::to_value(client.create_token(&request).await?)?
        }
        Command::Stats => serde_json::to_value(client.get_stats().await?)?,
        Command::Peers(PeersCommand::List) => json!({ "peers": client.get_peers().await? }),
        Command::Peers(PeersCommand::Add { url }) => client.add_peer(url).await?,
        Command::Chain => serde_json::to_value(client.validate_chain().await?)?,
        Command::Wallet(WalletCommand::Create) => serde_json::to_value(client.create_wallet().await?)?,
        Command::Wallet(WalletCommand::Balance { address }) => json!({
            "address": address,
            "balance": client.get_wallet_balance(address).await?,
        }),
        Command::Wallet(WalletCommand::History { address }) => json!({
            "address": address,
            "transactions": client.get_wallet_history(address).await?,
        }),
        Command::Wallet(WalletCommand::Transfer {
            from,
            to,
            amount,
            private_key,
        }) => {
            let request = TransferRequest {
                from_address: from.clone(),
                to_address: to.clone(),
                amount: *amount,
                private_key: private_key.clone(),
            };
            client.transfer(&request).await?
        }
        Command::Dashboard | Command::Ticker { .. } => {
            bail!("'{command:?}' is not a one-shot command")
        }
    };
    Ok(value)
}
