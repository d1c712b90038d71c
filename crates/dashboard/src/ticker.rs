//! Static ticker: a fixed set of text slots refreshed on a timer.

use crate::format::{format_number, plain_number};
use rand::Rng;
use sierpinski_api_client::{ApiClient, ApiResult, StatsUpdate, TokenData, TokenomicsData};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info};

/// Difficulty shown when the backend reports none.
pub const DEFAULT_DIFFICULTY: f64 = 4.0;
/// How long a rising block count stays highlighted.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(1);
/// Minimum window before the mining rate is recomputed without new blocks.
pub const RATE_WINDOW: Duration = Duration::from_secs(30);

const LOADING: &str = "Loading...";

/// Which endpoints feed the token slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TickerSource {
    /// `/api/token` supply and `/api/stats` `total_blocks`, printed raw.
    Token,
    /// `/api/tokenomics` supply and `/api/stats` `blocksFound`, grouped,
    /// with mining rate and new-block highlight.
    #[default]
    Tokenomics,
}

impl fmt::Display for TickerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickerSource::Token => write!(f, "token"),
            TickerSource::Tokenomics => write!(f, "tokenomics"),
        }
    }
}

impl FromStr for TickerSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "token" => Ok(TickerSource::Token),
            "tokenomics" => Ok(TickerSource::Tokenomics),
            other => Err(format!("unknown ticker source '{other}'")),
        }
    }
}

/// Text slots written by the ticker.
#[derive(Debug, Clone)]
pub struct TickerView {
    pub token_balance: String,
    pub blocks_mined: String,
    pub difficulty: String,
    /// Only written by the tokenomics source
    pub mining_rate: Option<String>,
    /// Cosmetic progress bar fill, 0..100
    pub progress: f64,
    /// Block count highlighted until this instant
    pub highlight_until: Option<Instant>,
    pub(crate) blocks: f64,
    pub(crate) rate: RateTracker,
}

impl Default for TickerView {
    fn default() -> Self {
        Self {
            token_balance: LOADING.to_string(),
            blocks_mined: LOADING.to_string(),
            difficulty: LOADING.to_string(),
            mining_rate: None,
            progress: 0.0,
            highlight_until: None,
            blocks: 0.0,
            rate: RateTracker::default(),
        }
    }
}

impl TickerView {
    pub fn is_highlighted(&self, now: Instant) -> bool {
        self.highlight_until.is_some_and(|until| now < until)
    }
}

/// Estimates blocks per minute from successive block counts.
#[derive(Debug, Clone, Default)]
pub struct RateTracker {
    reference: Option<(Instant, f64)>,
}

impl RateTracker {
    /// Records an observation and returns the new rate text when it changes.
    ///
    /// The first observation only sets the reference point. Later ones
    /// produce a rate when blocks were added or the window has elapsed; the
    /// reference moves forward once the window has elapsed.
    pub fn observe(&mut self, now: Instant, blocks: f64) -> Option<String> {
        let (since, base) = match self.reference {
            Some(reference) => reference,
            None => {
                self.reference = Some((now, blocks));
                return None;
            }
        };

        let elapsed = now.saturating_duration_since(since);
        let added = blocks - base;
        let window_elapsed = elapsed >= RATE_WINDOW;
        if added <= 0.0 && !window_elapsed {
            return None;
        }

        let per_minute = added / (elapsed.as_secs_f64() / 60.0);
        if window_elapsed {
            self.reference = Some((now, blocks));
        }
        Some(describe_rate(per_minute))
    }
}

/// Human-readable mining rate for a blocks-per-minute figure.
pub fn describe_rate(per_minute: f64) -> String {
    if per_minute <= 0.0 || !per_minute.is_finite() {
        return "Calculating...".to_string();
    }
    if per_minute >= 60.0 {
        format!("{:.1} blocks/sec", per_minute / 60.0)
    } else if per_minute >= 1.0 {
        format!("{per_minute:.1} blocks/min")
    } else {
        format!("{:.1} blocks/hour", per_minute * 60.0)
    }
}

/// Polls the backend and keeps a [`TickerView`] current.
#[derive(Debug)]
pub struct Ticker {
    client: ApiClient,
    source: TickerSource,
    period: Duration,
    view: Arc<RwLock<TickerView>>,
}

fn nonzero_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| *v != 0.0 && !v.is_nan()).unwrap_or(fallback)
}

impl Ticker {
    pub fn new(client: ApiClient, source: TickerSource, period: Duration) -> Self {
        Self {
            client,
            source,
            period,
            view: Arc::new(RwLock::new(TickerView::default())),
        }
    }

    pub fn source(&self) -> TickerSource {
        self.source
    }

    pub fn view(&self) -> Arc<RwLock<TickerView>> {
        Arc::clone(&self.view)
    }

    pub async fn snapshot(&self) -> TickerView {
        self.view.read().await.clone()
    }

    /// One refresh pass. A transport failure or a non-JSON body fails the
    /// pass and leaves the view as it was.
    pub async fn run_once(&self) -> ApiResult<()> {
        // Any JSON body counts, whatever its HTTP or `status` field; missing
        // fields read as zero.
        let supply = match self.source {
            TickerSource::Token => self
                .client
                .get_lenient::<TokenData>(&["api", "token"])
                .await?
                .total_supply
                .unwrap_or(0.0),
            TickerSource::Tokenomics => {
                self.client
                    .get_lenient::<TokenomicsData>(&["api", "tokenomics"])
                    .await?
                    .total_supply
            }
        };
        let stats: StatsUpdate = self.client.get_lenient(&["api", "stats"]).await?;
        let difficulty = nonzero_or(stats.difficulty, DEFAULT_DIFFICULTY);

        let now = Instant::now();
        let mut view = self.view.write().await;
        match self.source {
            TickerSource::Token => {
                let blocks = stats.total_blocks.unwrap_or(0.0);
                view.token_balance = format!("{} WŁ", plain_number(supply));
                view.blocks_mined = format!("Blocks Mined: {}", plain_number(blocks));
                view.blocks = blocks;
            }
            TickerSource::Tokenomics => {
                let blocks = stats.blocks_found.unwrap_or(0.0);
                if blocks > view.blocks {
                    view.highlight_until = Some(now + HIGHLIGHT_DURATION);
                }
                view.token_balance = format!("{} WŁ", format_number(supply));
                view.blocks_mined = format!("Blocks Mined: {}", format_number(blocks));
                view.blocks = blocks;
                if let Some(rate) = view.rate.observe(now, blocks) {
                    view.mining_rate = Some(format!("Mining Rate: {rate}"));
                }
                view.progress = rand::thread_rng().gen_range(0.0..100.0);
            }
        }
        view.difficulty = format!("Current Difficulty: {}", plain_number(difficulty));
        Ok(())
    }

    /// Runs `run_once` then sleeps for the period, forever.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(source = %self.source, period_ms = self.period.as_millis() as u64, "ticker started");
            loop {
                if let Err(err) = self.run_once().await {
                    error!(source = %self.source, error = %err, "error fetching data");
                }
                sleep(self.period).await;
            }
        })
    }
}
