//! Text rendering of the dashboard and ticker views.

use crate::format::{format_number, format_timestamp, plain_number, truncate};
use crate::fractal::{Scene, TextCanvas};
use crate::state::DashboardState;
use crate::ticker::TickerView;
use console::style;
use std::time::Instant;

pub const TITLE: &str = "Sierpinski Triangle Blockchain";
pub const SUBTITLE: &str = "Development Dashboard & Mining Console";

const LABEL_WIDTH: usize = 18;
const HASH_PREFIX: usize = 16;
const ADDRESS_PREFIX: usize = 8;
const PROGRESS_WIDTH: usize = 30;

#[derive(Default)]
struct Page {
    out: String,
}

impl Page {
    fn heading(&mut self, title: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.line(&style(title).bold().cyan().to_string());
        self.line(&"─".repeat(title.chars().count()));
    }

    fn field(&mut self, label: &str, value: impl AsRef<str>) {
        self.line(&format!("  {label:<LABEL_WIDTH$} {}", value.as_ref()));
    }

    fn item(&mut self, text: impl AsRef<str>) {
        self.line(&format!("    {}", text.as_ref()));
    }

    fn error(&mut self, message: &str) {
        self.line(&format!("  {}", style(message).red()));
    }

    fn control(&mut self, command: &str, label: &str, busy: Option<&str>) {
        match busy {
            Some(busy_label) => self.line(&format!("  {}", style(busy_label).dim())),
            None => self.line(&format!("  [{}] {}", style(command).yellow(), label)),
        }
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }
}

/// Renders the whole dashboard with the default canvas size.
pub fn render_dashboard(state: &DashboardState, scene: &Scene) -> String {
    render_dashboard_with(state, scene, &TextCanvas::default())
}

/// Renders the whole dashboard, rasterising `scene` at `canvas`'s size.
pub fn render_dashboard_with(state: &DashboardState, scene: &Scene, canvas: &TextCanvas) -> String {
    let mut page = Page::default();

    page.line(&style(TITLE).bold().to_string());
    page.line(&style(SUBTITLE).dim().to_string());

    mining_section(&mut page, state);

    page.heading("Sierpinski Triangle");
    for row in canvas.render(scene).lines() {
        page.line(&format!("  {row}"));
    }

    token_section(&mut page, state);
    rewards_section(&mut page, state);
    wallet_section(&mut page, state);
    tokenomics_section(&mut page, state);
    network_section(&mut page, state);
    ledger_section(&mut page, state);

    page.out
}

fn mining_section(page: &mut Page, state: &DashboardState) {
    let stats = &state.stats;
    page.heading("Mining Control");
    if state.is_mining {
        page.line(&format!("  {} Mining", style("●").green()));
        page.control("mine", "Pause Mining", None);
    } else {
        page.line(&format!("  {} Idle", style("●").red()));
        page.control("mine", "Start Mining", None);
    }
    page.control("reset", "Reset", None);
    page.field("Hash Rate", format!("{:.2} H/s", stats.hash_rate));
    page.field("Blocks Found", plain_number(stats.blocks_found));
    page.field("Triangles", plain_number(stats.triangle_count));
    page.field("Difficulty", plain_number(stats.difficulty));
    page.field("Nonce", plain_number(stats.nonce));
    page.field("Current Hash", &stats.current_hash);
}

fn token_section(page: &mut Page, state: &DashboardState) {
    page.heading("Władysłaium Token");
    if let Some(error) = &state.token_error {
        page.error(error);
    }

    match &state.token {
        Some(token) => {
            page.field("Token Name", &token.token_name);
            page.field("Symbol", &token.symbol);
            page.field("Initial Supply", format_number(token.initial_supply));
            page.field("Owner", &token.owner);
            page.field("Created At", format_timestamp(token.creation_time));
        }
        None => {
            page.line("  No token found. Create one to get started.");
            let busy = state.creating_token.then_some("Creating...");
            page.control("token create", "Create Token", busy);
        }
    }
}

fn rewards_section(page: &mut Page, state: &DashboardState) {
    page.heading("Mining Rewards");
    page.field(
        "Total Rewards",
        format!("{} WŁ", plain_number(state.stats.total_rewards)),
    );
    page.field(
        "Average Reward",
        format!("{:.2} WŁ", state.stats.average_reward),
    );
    page.line("  Recent Rewards");
    if state.rewards.is_empty() {
        page.item("No rewards yet");
    }
    for reward in &state.rewards {
        page.item(format!(
            "{} WŁ  Miner: {}  {}",
            plain_number(reward.amount),
            reward.miner,
            format_timestamp(reward.timestamp)
        ));
    }
}

fn wallet_section(page: &mut Page, state: &DashboardState) {
    page.heading("Wallet Management");
    let Some(wallet) = &state.wallet else {
        page.line("  No wallet connected");
        if let Some(error) = &state.wallet_error {
            page.error(error);
        }
        let busy = state.creating_wallet.then_some("Creating...");
        page.control("wallet create", "Create Wallet", busy);
        return;
    };

    page.field("Wallet Address", &wallet.address);
    page.field("Balance", format!("{} WŁ", plain_number(state.balance)));
    page.control("balance", "Refresh", None);

    page.line("  Transfer Tokens");
    page.field("Recipient Address", &state.transfer_recipient);
    page.field("Amount", &state.transfer_amount);
    if let Some(error) = &state.transfer_error {
        page.error(error);
    }
    let busy = state.transferring.then_some("Transferring...");
    page.control("transfer <to> <amount>", "Transfer", busy);

    page.line("  Transaction History");
    for tx in &state.transactions {
        let (direction, counterparty) = if tx.is_outgoing(&wallet.address) {
            ("Sent", format!("To: {}...", truncate(&tx.to, ADDRESS_PREFIX)))
        } else {
            ("Received", format!("From: {}...", truncate(&tx.from, ADDRESS_PREFIX)))
        };
        page.item(format!(
            "{direction} {} WŁ  {counterparty}  {}",
            plain_number(tx.amount),
            format_timestamp(tx.timestamp)
        ));
    }
}

fn tokenomics_section(page: &mut Page, state: &DashboardState) {
    page.heading("Tokenomics");
    if let Some(tokenomics) = &state.tokenomics {
        page.field(
            "Total Supply",
            format!("{} WŁ", plain_number(tokenomics.total_supply)),
        );
        page.field("Holders", plain_number(tokenomics.holder_count));
        page.field("Transactions", plain_number(tokenomics.transaction_count));
        page.field(
            "Mining Reward",
            format!("{} WŁ", plain_number(tokenomics.mining_reward)),
        );
    }
}

fn network_section(page: &mut Page, state: &DashboardState) {
    page.heading("P2P Network Status");
    page.field("Connected Peers", state.peers.len().to_string());
    page.field("Consensus (%)", plain_number(state.stats.consensus));
    page.line("  Peer List");
    for peer in &state.peers {
        page.item(format!("{}  [{}]", peer.url, peer.status));
    }
    if let Some(error) = &state.peer_error {
        page.error(error);
    }
    let busy = state.adding_peer.then_some("Adding...");
    page.control("peer add <url>", "Add Peer", busy);
}

fn ledger_section(page: &mut Page, state: &DashboardState) {
    let chain = &state.chain;
    page.heading("Immutable Ledger Status");
    page.field("Chain Height", chain.height.to_string());
    let status = if chain.is_valid {
        style("Valid").green()
    } else {
        style("Invalid").red()
    };
    page.field("Chain Status", status.to_string());
    page.field("Latest Block Hash", &chain.last_block_hash);
    page.line("  Recent Blocks");
    for block in &state.latest_blocks {
        page.item(format!(
            "Position: ({}, {})  {}",
            plain_number(block.position[0]),
            plain_number(block.position[1]),
            format_timestamp(block.timestamp)
        ));
        page.item(format!(
            "  Hash: {}...",
            truncate(&block.transaction_hash, HASH_PREFIX)
        ));
        let previous = match block.previous() {
            Some(hash) => format!("{}...", truncate(hash, HASH_PREFIX)),
            None => "Genesis".to_string(),
        };
        page.item(format!("  Prev: {previous}"));
    }
}

/// Renders the ticker slots.
pub fn render_ticker(view: &TickerView, now: Instant) -> String {
    let mut page = Page::default();
    page.line(&style(TITLE).bold().to_string());
    page.line(&view.token_balance);
    if view.is_highlighted(now) {
        page.line(&style(&view.blocks_mined).green().bold().to_string());
    } else {
        page.line(&view.blocks_mined);
    }
    page.line(&view.difficulty);
    if let Some(rate) = &view.mining_rate {
        page.line(rate);
    }

    let filled = ((view.progress.clamp(0.0, 100.0) / 100.0) * PROGRESS_WIDTH as f64).round() as usize;
    page.line(&format!(
        "[{}{}]",
        style("█".repeat(filled)).green(),
        "░".repeat(PROGRESS_WIDTH - filled)
    ));
    page.out
}
