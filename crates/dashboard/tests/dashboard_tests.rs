//! Dashboard behaviour against a mock backend.

use mockito::{Matcher, Server};
use serde_json::json;
use sierpinski_api_client::{ApiClient, PeerStatus, WalletData};
use sierpinski_config::DashboardConfig;
use sierpinski_dashboard::render::{SUBTITLE, TITLE};
use sierpinski_dashboard::{
    render_dashboard, ActionOutcome, Dashboard, DashboardState, PollLoop, Scene,
};
use std::net::TcpListener;
use std::time::{Duration, Instant};

const TOKEN_BODY: &str = r#"{"token_name":"Władysłaium","symbol":"WŁ","initial_supply":1000000,"owner":"owner_ABC123","creation_time":1672531200}"#;

fn localhost_binding_permitted() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn fast_config() -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.polling.network_ms = 25;
    config.polling.rewards_ms = 25;
    config.polling.tokenomics_ms = 25;
    config.polling.mining_ms = 10;
    config
}

fn dashboard_for(server: &Server) -> Dashboard {
    let client = ApiClient::new(&server.url()).expect("client");
    Dashboard::new(client, &fast_config())
}

fn rendered(state: &DashboardState) -> String {
    console::strip_ansi_codes(&render_dashboard(state, &Scene::default())).into_owned()
}

async fn wait_until<F>(dashboard: &Dashboard, check: F) -> bool
where
    F: Fn(&DashboardState) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if check(&dashboard.snapshot().await) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

async fn with_wallet(dashboard: &Dashboard) {
    dashboard.state().write().await.wallet = Some(WalletData {
        address: "addr_alice".into(),
        private_key: "key_alice".into(),
    });
}

#[tokio::test]
async fn header_renders_without_any_data() {
    let text = rendered(&DashboardState::default());
    assert!(text.contains(TITLE));
    assert!(text.contains(SUBTITLE));

    let failed = DashboardState {
        token_error: Some("Error fetching token data: connection refused".into()),
        ..DashboardState::default()
    };
    let text = rendered(&failed);
    assert!(text.contains(TITLE));
    assert!(text.contains(SUBTITLE));
}

#[tokio::test]
async fn token_fields_render_after_fetch() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _token = server
        .mock("GET", "/api/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TOKEN_BODY)
        .create_async()
        .await;

    let dashboard = dashboard_for(&server);
    assert_eq!(dashboard.fetch_token().await, ActionOutcome::Done);

    let text = rendered(&dashboard.snapshot().await);
    assert!(text.contains("Władysłaium"));
    assert!(text.contains("WŁ"));
    assert!(text.contains("1,000,000"));
    assert!(text.contains("owner_ABC123"));
    assert!(!text.contains("Create Token"));
}

#[tokio::test]
async fn missing_token_offers_create_then_shows_fields() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let not_found = server
        .mock("GET", "/api/token")
        .with_status(404)
        .with_body(r#"{"error":"Token not found"}"#)
        .create_async()
        .await;

    let dashboard = dashboard_for(&server);
    assert_eq!(
        dashboard.fetch_token().await,
        ActionOutcome::Failed("Token not found".into())
    );

    let state = dashboard.snapshot().await;
    assert!(state.token.is_none());
    let text = rendered(&state);
    assert!(text.contains("Token not found"));
    assert!(text.contains("No token found. Create one to get started."));
    assert!(text.contains("Create Token"));

    not_found.remove_async().await;
    let create = server
        .mock("POST", "/api/token/create")
        .match_body(Matcher::Json(
            json!({"initial_supply": 1000000, "owner_address": "owner_ABC123"}),
        ))
        .with_status(200)
        .with_body(format!(r#"{{"status":"success","token":{TOKEN_BODY}}}"#))
        .create_async()
        .await;
    let _found = server
        .mock("GET", "/api/token")
        .with_status(200)
        .with_body(TOKEN_BODY)
        .create_async()
        .await;

    assert_eq!(dashboard.create_token().await, ActionOutcome::Done);
    create.assert_async().await;

    let state = dashboard.snapshot().await;
    assert!(state.token_error.is_none());
    assert!(!state.creating_token);
    let text = rendered(&state);
    assert!(!text.contains("Token not found"));
    assert!(!text.contains("Create Token"));
    assert!(text.contains("Władysłaium"));
    assert!(text.contains("owner_ABC123"));
}

#[tokio::test]
async fn failed_token_creation_keeps_server_message() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _create = server
        .mock("POST", "/api/token/create")
        .with_status(409)
        .with_body(r#"{"error":"Token already exists"}"#)
        .create_async()
        .await;

    let dashboard = dashboard_for(&server);
    assert_eq!(
        dashboard.create_token().await,
        ActionOutcome::Failed("Token already exists".into())
    );
    let state = dashboard.snapshot().await;
    assert_eq!(state.token_error.as_deref(), Some("Token already exists"));
    assert!(!state.creating_token);
}

#[tokio::test]
async fn busy_action_sends_no_request() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/api/token/create")
        .expect(0)
        .create_async()
        .await;

    let dashboard = dashboard_for(&server);
    dashboard.state().write().await.creating_token = true;
    assert_eq!(dashboard.create_token().await, ActionOutcome::Skipped);
    create.assert_async().await;
}

#[tokio::test]
async fn failed_transfer_shows_message_and_keeps_wallet() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let transfer = server
        .mock("POST", "/api/wallet/transfer")
        .match_body(Matcher::Json(json!({
            "from_address": "addr_alice",
            "to_address": "addr_bob",
            "amount": 5000,
            "private_key": "key_alice"
        })))
        .with_status(400)
        .with_body(r#"{"status":"error","error":"Insufficient balance"}"#)
        .create_async()
        .await;
    let balance = server
        .mock("GET", Matcher::Regex("^/api/wallet/balance/.*".into()))
        .expect(0)
        .create_async()
        .await;

    let dashboard = dashboard_for(&server);
    with_wallet(&dashboard).await;
    dashboard.state().write().await.balance = 100.0;
    dashboard.set_transfer_form("addr_bob", "5000").await;

    assert_eq!(
        dashboard.transfer().await,
        ActionOutcome::Failed("Insufficient balance".into())
    );
    transfer.assert_async().await;
    balance.assert_async().await;

    let state = dashboard.snapshot().await;
    assert_eq!(state.transfer_error.as_deref(), Some("Insufficient balance"));
    assert_eq!(
        state.wallet,
        Some(WalletData {
            address: "addr_alice".into(),
            private_key: "key_alice".into(),
        })
    );
    assert_eq!(state.balance, 100.0);
    assert!(!state.transferring);
    assert_eq!(state.transfer_recipient, "addr_bob");
    assert_eq!(state.transfer_amount, "5000");
    assert!(rendered(&state).contains("Insufficient balance"));
}

#[tokio::test]
async fn successful_transfer_clears_form_and_refreshes_wallet() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _transfer = server
        .mock("POST", "/api/wallet/transfer")
        .with_status(200)
        .with_body(r#"{"status":"success"}"#)
        .create_async()
        .await;
    let _balance = server
        .mock("GET", "/api/wallet/balance/addr_alice")
        .with_status(200)
        .with_body(r#"{"status":"success","balance":90}"#)
        .create_async()
        .await;
    let _history = server
        .mock("GET", "/api/wallet/history/addr_alice")
        .with_status(200)
        .with_body(
            r#"{"status":"success","transactions":[{"from":"addr_alice","to":"addr_bob","amount":10,"timestamp":1700000000,"hash":"h1"}]}"#,
        )
        .create_async()
        .await;

    let dashboard = dashboard_for(&server);
    with_wallet(&dashboard).await;
    dashboard.set_transfer_form("addr_bob", "10").await;

    assert_eq!(dashboard.transfer().await, ActionOutcome::Done);
    let state = dashboard.snapshot().await;
    assert!(state.transfer_error.is_none());
    assert!(state.transfer_recipient.is_empty());
    assert!(state.transfer_amount.is_empty());
    assert_eq!(state.balance, 90.0);
    assert_eq!(state.transactions.len(), 1);
}

#[tokio::test]
async fn transfer_validates_form_locally() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let transfer = server
        .mock("POST", "/api/wallet/transfer")
        .expect(0)
        .create_async()
        .await;

    let dashboard = dashboard_for(&server);
    dashboard.set_transfer_form("addr_bob", "10").await;
    // no wallet yet
    assert_eq!(dashboard.transfer().await, ActionOutcome::Skipped);

    with_wallet(&dashboard).await;
    dashboard.set_transfer_form("addr_bob", "ten").await;
    assert_eq!(
        dashboard.transfer().await,
        ActionOutcome::Failed("Transfer failed: invalid amount".into())
    );
    transfer.assert_async().await;
}

#[tokio::test]
async fn wallet_creation_resets_balance_and_loads_history() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _create = server
        .mock("POST", "/api/wallet/create")
        .with_status(200)
        .with_body(r#"{"status":"success","address":"addr_new","private_key":"key_new"}"#)
        .create_async()
        .await;
    let history = server
        .mock("GET", "/api/wallet/history/addr_new")
        .with_status(200)
        .with_body(r#"{"status":"success","transactions":[]}"#)
        .create_async()
        .await;

    let dashboard = dashboard_for(&server);
    dashboard.state().write().await.balance = 12.0;
    assert_eq!(dashboard.create_wallet().await, ActionOutcome::Done);
    history.assert_async().await;

    let state = dashboard.snapshot().await;
    assert_eq!(state.wallet.map(|w| w.address), Some("addr_new".to_string()));
    assert_eq!(state.balance, 0.0);
    assert!(!state.creating_wallet);
}

#[tokio::test]
async fn add_peer_refetches_list() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let add = server
        .mock("POST", "/api/peers")
        .match_body(Matcher::Json(json!({"peer_url": "ws://localhost:8765"})))
        .with_status(200)
        .with_body(r#"{"status":"success"}"#)
        .create_async()
        .await;
    let _list = server
        .mock("GET", "/api/peers")
        .with_status(200)
        .with_body(r#"{"peers":["ws://localhost:8765"]}"#)
        .create_async()
        .await;

    let dashboard = dashboard_for(&server);
    assert_eq!(dashboard.add_peer("").await, ActionOutcome::Skipped);
    assert_eq!(dashboard.add_peer("ws://localhost:8765").await, ActionOutcome::Done);
    add.assert_async().await;

    let state = dashboard.snapshot().await;
    assert_eq!(state.peers.len(), 1);
    assert_eq!(state.peers[0].status, PeerStatus::Connected);
    assert!(state.peer_error.is_none());
}

#[tokio::test]
async fn reads_merge_only_accepted_responses() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _stats = server
        .mock("GET", "/api/stats")
        .with_status(200)
        .with_body(r#"{"hashRate":12.5,"blocksFound":3,"triangleCount":9,"nonce":77}"#)
        .create_async()
        .await;
    let _rewards = server
        .mock("GET", "/api/rewards")
        .with_status(200)
        .with_body(r#"{"status":"error","rewards":[{"miner":"m","amount":50}]}"#)
        .create_async()
        .await;
    let _tokenomics = server
        .mock("GET", "/api/tokenomics")
        .with_status(500)
        .with_body(r#"{"status":"success","total_supply":1000050,"holder_count":2}"#)
        .create_async()
        .await;

    let dashboard = dashboard_for(&server);
    dashboard.refresh_stats().await;
    dashboard.refresh_rewards().await;
    dashboard.refresh_tokenomics().await;

    let state = dashboard.snapshot().await;
    assert_eq!(state.stats.hash_rate, 12.5);
    assert_eq!(state.stats.blocks_found, 3.0);
    assert_eq!(state.stats.consensus, 67.0);
    assert!(state.rewards.is_empty());
    assert_eq!(state.tokenomics.map(|t| t.total_supply), Some(1_000_050.0));

    dashboard.reset_mining().await;
    let stats = dashboard.snapshot().await.stats;
    assert_eq!(stats.hash_rate, 0.0);
    assert_eq!(stats.blocks_found, 0.0);
    assert_eq!(stats.triangle_count, 1.0);
    assert_eq!(stats.nonce, 0.0);
    assert_eq!(stats.difficulty, 4.0);
}

#[tokio::test]
async fn loops_survive_failed_fetches() {
    if !localhost_binding_permitted() {
        return;
    }
    // Nothing mocked yet: every request is answered with 501.
    let mut server = Server::new_async().await;
    let dashboard = dashboard_for(&server);
    dashboard.mount().await;

    assert!(
        wait_until(&dashboard, |state| state.token_error.is_some()).await,
        "token fetch never failed"
    );
    tokio::time::sleep(Duration::from_millis(150)).await;
    let state = dashboard.snapshot().await;
    assert_eq!(state.stats.blocks_found, 0.0);
    assert!(state.peers.is_empty());
    assert!(dashboard.is_polling(PollLoop::Network).await);
    assert!(dashboard.is_polling(PollLoop::Rewards).await);
    assert!(dashboard.is_polling(PollLoop::Tokenomics).await);

    let _stats = server
        .mock("GET", "/api/stats")
        .with_status(200)
        .with_body(r#"{"blocksFound":42}"#)
        .create_async()
        .await;
    let _peers = server
        .mock("GET", "/api/peers")
        .with_status(200)
        .with_body(r#"{"peers":["ws://a:8765"]}"#)
        .create_async()
        .await;

    assert!(
        wait_until(&dashboard, |state| state.stats.blocks_found == 42.0
            && state.peers.len() == 1)
        .await,
        "loops stopped after failures"
    );

    dashboard.unmount().await;
    assert!(!dashboard.is_polling(PollLoop::Network).await);
}

#[tokio::test]
async fn mining_toggle_controls_fast_loop() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let stats = server
        .mock("GET", "/api/stats")
        .with_status(200)
        .with_body(r#"{"nonce":5}"#)
        .expect_at_least(2)
        .create_async()
        .await;

    let dashboard = dashboard_for(&server);
    assert!(dashboard.toggle_mining().await);
    assert!(dashboard.is_polling(PollLoop::Mining).await);
    assert!(wait_until(&dashboard, |state| state.stats.nonce == 5.0).await);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!dashboard.toggle_mining().await);
    assert!(!dashboard.is_polling(PollLoop::Mining).await);
    assert!(!dashboard.snapshot().await.is_mining);
    stats.assert_async().await;

    dashboard.toggle_mining().await;
    dashboard.unmount().await;
    assert!(!dashboard.is_polling(PollLoop::Mining).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_toggles_leave_flag_and_loop_in_agreement() {
    let client = ApiClient::new("http://127.0.0.1:1").expect("client");
    let dashboard = Dashboard::new(client, &fast_config());

    for round in 0..20 {
        let toggles: Vec<_> = (0..9)
            .map(|_| {
                let dashboard = dashboard.clone();
                tokio::spawn(async move { dashboard.toggle_mining().await })
            })
            .collect();
        for toggle in toggles {
            toggle.await.expect("toggle task");
        }

        let mining = dashboard.snapshot().await.is_mining;
        assert_eq!(mining, round % 2 == 0, "odd number of toggles per round");
        assert_eq!(dashboard.is_polling(PollLoop::Mining).await, mining);
    }

    dashboard.unmount().await;
}
