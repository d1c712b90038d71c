//! Dashboard controller: poll loops, mining toggle and user actions.

use crate::state::{parse_leading_int, Busy, DashboardState, SharedState};
use crate::tasks::{PollLoop, PollTasks};
use sierpinski_api_client::{
    latest_blocks, ApiClient, ApiError, CreateTokenRequest, PeerData, TransferRequest,
    LATEST_BLOCKS,
};
use sierpinski_config::{DashboardConfig, PollingConfig, TokenConfig};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Result of a user-triggered action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    /// The message shown to the user
    Failed(String),
    /// Busy, or the form was incomplete; no request was sent
    Skipped,
}

impl ActionOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, ActionOutcome::Done)
    }
}

/// Owns the view state and everything that writes to it.
///
/// Cloning is cheap and every clone drives the same state and loops.
#[derive(Debug, Clone)]
pub struct Dashboard {
    client: ApiClient,
    state: SharedState,
    tasks: Arc<PollTasks>,
    polling: PollingConfig,
    token: TokenConfig,
}

/// Message for a failed action: the server's own message when it sent one,
/// otherwise `fallback`, or `prefix` plus the error when no answer arrived.
fn failure_message(err: &ApiError, fallback: &str, prefix: &str) -> String {
    if err.is_server_response() {
        err.server_message().unwrap_or(fallback).to_string()
    } else {
        format!("{prefix}: {err}")
    }
}

impl Dashboard {
    pub fn new(client: ApiClient, config: &DashboardConfig) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(DashboardState::default())),
            tasks: Arc::new(PollTasks::new()),
            polling: config.polling.clone(),
            token: config.token.clone(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    /// Clone of the current view state.
    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    // Lifecycle

    /// Starts the poll loops and fetches the token once.
    pub async fn mount(&self) {
        let this = self.clone();
        tokio::spawn(async move {
            this.fetch_token().await;
        });

        self.start_loop(PollLoop::Network, self.polling.network(), |this| async move {
            this.refresh_network().await
        })
        .await;
        self.start_loop(PollLoop::Rewards, self.polling.rewards(), |this| async move {
            this.refresh_rewards().await
        })
        .await;
        self.start_loop(
            PollLoop::Tokenomics,
            self.polling.tokenomics(),
            |this| async move { this.refresh_tokenomics().await },
        )
        .await;

        let state = self.state.read().await;
        if state.is_mining {
            self.start_mining_loop().await;
        }
        drop(state);
        info!(base_url = %self.client.base_url(), "dashboard mounted");
    }

    /// Stops every loop, the mining loop included.
    pub async fn unmount(&self) {
        self.tasks.stop_all().await;
        info!("dashboard unmounted");
    }

    pub async fn is_polling(&self, kind: PollLoop) -> bool {
        self.tasks.is_running(kind).await
    }

    async fn start_loop<F, Fut>(&self, kind: PollLoop, period: std::time::Duration, tick: F)
    where
        F: Fn(Dashboard) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let this = self.clone();
        self.tasks
            .start(kind, period, move || tick(this.clone()))
            .await;
    }

    async fn start_mining_loop(&self) {
        self.start_loop(PollLoop::Mining, self.polling.mining(), |this| async move {
            this.refresh_stats().await
        })
        .await;
    }

    // Mining controls

    /// Flips mining on or off and returns the new state.
    ///
    /// Mining here only means polling stats faster; the backend does the work.
    pub async fn toggle_mining(&self) -> bool {
        // The loop changes under the state lock so the flag and the loop agree.
        let mut state = self.state.write().await;
        state.is_mining = !state.is_mining;
        let mining = state.is_mining;
        if mining {
            self.start_mining_loop().await;
        } else {
            self.tasks.stop(PollLoop::Mining).await;
        }
        drop(state);
        info!(mining, "mining toggled");
        mining
    }

    /// Stops mining and clears the mining counters.
    pub async fn reset_mining(&self) {
        let mut state = self.state.write().await;
        self.tasks.stop(PollLoop::Mining).await;
        state.is_mining = false;
        state.stats.reset_mining();
        info!("mining reset");
    }

    // Poll loop bodies

    /// Stats, peers, chain validation and ledger, concurrently.
    pub async fn refresh_network(&self) {
        futures::join!(
            self.refresh_stats(),
            self.refresh_peers(),
            self.refresh_chain(),
            self.refresh_ledger(),
        );
    }

    pub async fn refresh_stats(&self) {
        match self.client.get_stats().await {
            Ok(update) => self.state.write().await.stats.merge(update),
            Err(err) => warn!(endpoint = "/api/stats", error = %err, "error fetching stats"),
        }
    }

    pub async fn refresh_peers(&self) {
        match self.client.get_peers().await {
            Ok(peers) => {
                self.state.write().await.peers = peers.into_iter().map(PeerData::listed).collect();
            }
            Err(err) => warn!(endpoint = "/api/peers", error = %err, "error fetching peers"),
        }
    }

    pub async fn refresh_chain(&self) {
        match self.client.validate_chain().await {
            Ok(chain) => self.state.write().await.chain = chain,
            Err(err) => warn!(
                endpoint = "/api/chain/validate",
                error = %err,
                "error validating chain"
            ),
        }
    }

    pub async fn refresh_ledger(&self) {
        match self.client.get_ledger().await {
            Ok(ledger) => {
                self.state.write().await.latest_blocks = latest_blocks(&ledger, LATEST_BLOCKS);
            }
            Err(err) => warn!(endpoint = "/api/ledger", error = %err, "error fetching latest blocks"),
        }
    }

    pub async fn refresh_rewards(&self) {
        match self.client.get_rewards().await {
            Ok(rewards) => self.state.write().await.rewards = rewards,
            Err(err) => warn!(endpoint = "/api/rewards", error = %err, "error fetching mining rewards"),
        }
    }

    pub async fn refresh_tokenomics(&self) {
        match self.client.get_tokenomics().await {
            Ok(tokenomics) => self.state.write().await.tokenomics = Some(tokenomics),
            Err(err) => warn!(endpoint = "/api/tokenomics", error = %err, "error fetching tokenomics"),
        }
    }

    // Actions

    async fn try_begin(&self, busy: Busy) -> bool {
        let mut state = self.state.write().await;
        let flag = state.busy_flag(busy);
        if *flag {
            debug!(action = ?busy, "action already running");
            return false;
        }
        *flag = true;
        true
    }

    async fn finish(&self, busy: Busy) {
        *self.state.write().await.busy_flag(busy) = false;
    }

    /// Loads the token; a missing token leaves an error for the create control.
    pub async fn fetch_token(&self) -> ActionOutcome {
        match self.client.get_token().await {
            Ok(token) => {
                let mut state = self.state.write().await;
                state.token = Some(token);
                state.token_error = None;
                ActionOutcome::Done
            }
            Err(err) => {
                let message = failure_message(&err, "Token not found", "Error fetching token data");
                warn!(endpoint = "/api/token", error = %err, "token fetch failed");
                self.state.write().await.token_error = Some(message.clone());
                ActionOutcome::Failed(message)
            }
        }
    }

    /// Creates the token with the configured supply and owner, then reloads it.
    pub async fn create_token(&self) -> ActionOutcome {
        if !self.try_begin(Busy::CreatingToken).await {
            return ActionOutcome::Skipped;
        }
        self.state.write().await.token_error = None;

        let request = CreateTokenRequest::new(self.token.initial_supply, self.token.owner_address.clone());
        let outcome = match self.client.create_token(&request).await {
            Ok(token) => {
                info!(symbol = %token.symbol, owner = %token.owner, "token created");
                self.state.write().await.token = Some(token);
                self.fetch_token().await;
                ActionOutcome::Done
            }
            Err(err) => {
                let message = failure_message(&err, "Failed to create token", "Error creating token");
                warn!(endpoint = "/api/token/create", error = %err, "token creation failed");
                self.state.write().await.token_error = Some(message.clone());
                ActionOutcome::Failed(message)
            }
        };

        self.finish(Busy::CreatingToken).await;
        outcome
    }

    /// Creates a wallet and loads its history.
    pub async fn create_wallet(&self) -> ActionOutcome {
        if !self.try_begin(Busy::CreatingWallet).await {
            return ActionOutcome::Skipped;
        }
        self.state.write().await.wallet_error = None;

        let outcome = match self.client.create_wallet().await {
            Ok(wallet) => {
                info!(address = %wallet.address, "wallet created");
                let address = wallet.address.clone();
                {
                    let mut state = self.state.write().await;
                    state.wallet = Some(wallet);
                    state.balance = 0.0;
                    state.transactions.clear();
                }
                self.fetch_history(&address).await;
                ActionOutcome::Done
            }
            Err(err) => {
                let message = failure_message(&err, "Failed to create wallet", "Error creating wallet");
                warn!(endpoint = "/api/wallet/create", error = %err, "wallet creation failed");
                self.state.write().await.wallet_error = Some(message.clone());
                ActionOutcome::Failed(message)
            }
        };

        self.finish(Busy::CreatingWallet).await;
        outcome
    }

    /// Reloads the wallet balance. Failures are only logged.
    pub async fn refresh_balance(&self) -> ActionOutcome {
        let Some(address) = self.wallet_address().await else {
            return ActionOutcome::Skipped;
        };
        match self.client.get_wallet_balance(&address).await {
            Ok(balance) => {
                self.state.write().await.balance = balance;
                ActionOutcome::Done
            }
            Err(err) => {
                warn!(address = %address, error = %err, "error refreshing balance");
                ActionOutcome::Failed(err.to_string())
            }
        }
    }

    /// Replaces the transaction list with the wallet's history.
    pub async fn fetch_history(&self, address: &str) -> ActionOutcome {
        match self.client.get_wallet_history(address).await {
            Ok(transactions) => {
                self.state.write().await.transactions = transactions;
                ActionOutcome::Done
            }
            Err(err) => {
                warn!(address = %address, error = %err, "error fetching transaction history");
                ActionOutcome::Failed(err.to_string())
            }
        }
    }

    /// Fills in the transfer form.
    pub async fn set_transfer_form(&self, recipient: impl Into<String>, amount: impl Into<String>) {
        let mut state = self.state.write().await;
        state.transfer_recipient = recipient.into();
        state.transfer_amount = amount.into();
    }

    /// Submits the transfer form from the current wallet.
    ///
    /// On failure the server's message is kept verbatim and the wallet, the
    /// balance and the form are left as they were.
    pub async fn transfer(&self) -> ActionOutcome {
        let request = {
            let mut state = self.state.write().await;
            if !state.transfer_ready() {
                return ActionOutcome::Skipped;
            }
            let Some(wallet) = state.wallet.clone() else {
                return ActionOutcome::Skipped;
            };
            let Some(amount) = parse_leading_int(&state.transfer_amount) else {
                let message = "Transfer failed: invalid amount".to_string();
                state.transfer_error = Some(message.clone());
                return ActionOutcome::Failed(message);
            };
            state.transferring = true;
            state.transfer_error = None;
            TransferRequest::from_wallet(&wallet, state.transfer_recipient.clone(), amount)
        };

        let outcome = match self.client.transfer(&request).await {
            Ok(_) => {
                info!(
                    from = %request.from_address,
                    to = %request.to_address,
                    amount = request.amount,
                    "transfer accepted"
                );
                {
                    let mut state = self.state.write().await;
                    state.transfer_recipient.clear();
                    state.transfer_amount.clear();
                }
                self.refresh_balance().await;
                self.fetch_history(&request.from_address).await;
                ActionOutcome::Done
            }
            Err(err) => {
                let message = failure_message(&err, "Transfer failed", "Transfer failed");
                warn!(endpoint = "/api/wallet/transfer", error = %err, "transfer failed");
                self.state.write().await.transfer_error = Some(message.clone());
                ActionOutcome::Failed(message)
            }
        };

        self.finish(Busy::Transferring).await;
        outcome
    }

    /// Registers a peer with the backend and reloads the peer list.
    pub async fn add_peer(&self, peer_url: &str) -> ActionOutcome {
        if peer_url.is_empty() {
            return ActionOutcome::Skipped;
        }
        if !self.try_begin(Busy::AddingPeer).await {
            return ActionOutcome::Skipped;
        }
        self.state.write().await.peer_error = None;

        let outcome = match self.client.add_peer(peer_url).await {
            Ok(_) => {
                info!(peer = %peer_url, "peer added");
                self.refresh_peers().await;
                ActionOutcome::Done
            }
            Err(err) => {
                let message = failure_message(&err, "Failed to add peer", "Error adding peer");
                warn!(peer = %peer_url, error = %err, "error adding peer");
                self.state.write().await.peer_error = Some(message.clone());
                ActionOutcome::Failed(message)
            }
        };

        self.finish(Busy::AddingPeer).await;
        outcome
    }

    async fn wallet_address(&self) -> Option<String> {
        self.state
            .read()
            .await
            .wallet
            .as_ref()
            .map(|wallet| wallet.address.clone())
    }
}
