//! Endpoint tests against a mock backend.
//!
//! Each test spins up a mockito server with the backend's response shapes.

use mockito::{Matcher, Server};
use serde_json::json;
use sierpinski_api_client::{
    latest_blocks, ApiClient, ApiError, PeerStatus, TransferRequest, Url, WalletData,
    LATEST_BLOCKS,
};
use std::net::TcpListener;
use std::time::Duration;

fn localhost_binding_permitted() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client_for(server: &Server) -> ApiClient {
    ApiClient::builder(Url::parse(&server.url()).unwrap())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

fn wallet() -> WalletData {
    WalletData {
        address: "addr_alice".to_string(),
        private_key: "key_alice".to_string(),
    }
}

#[tokio::test]
async fn wallet_create_balance_and_history() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _create = server
        .mock("POST", "/api/wallet/create")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"success","address":"addr_alice","private_key":"key_alice"}"#)
        .create_async()
        .await;
    let _balance = server
        .mock("GET", "/api/wallet/balance/addr_alice")
        .with_status(200)
        .with_body(r#"{"status":"success","balance":250.5}"#)
        .create_async()
        .await;
    let _history = server
        .mock("GET", "/api/wallet/history/addr_alice")
        .with_status(200)
        .with_body(
            json!({
                "status": "success",
                "transactions": [
                    {"from": "addr_alice", "to": "addr_bob", "amount": 10, "timestamp": 1700000000, "hash": "h1"},
                    {"from": "addr_carol", "to": "addr_alice", "amount": 5, "timestamp": 1700000100, "hash": "h2"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let created = client.create_wallet().await.unwrap();
    assert_eq!(created, wallet());

    assert_eq!(client.get_wallet_balance("addr_alice").await.unwrap(), 250.5);

    let history = client.get_wallet_history("addr_alice").await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].is_outgoing("addr_alice"));
    assert!(!history[1].is_outgoing("addr_alice"));
}

#[tokio::test]
async fn transfer_sends_credentials_and_surfaces_rejection_verbatim() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/wallet/transfer")
        .match_body(Matcher::Json(json!({
            "from_address": "addr_alice",
            "to_address": "addr_bob",
            "amount": 1000,
            "private_key": "key_alice"
        })))
        .with_status(400)
        .with_body(r#"{"status":"error","error":"Insufficient balance"}"#)
        .create_async()
        .await;

    let request = TransferRequest::from_wallet(&wallet(), "addr_bob", 1000);
    let err = client_for(&server).transfer(&request).await.unwrap_err();

    assert!(matches!(err, ApiError::Rejected { .. }));
    assert_eq!(err.server_message(), Some("Insufficient balance"));
    m.assert_async().await;
}

#[tokio::test]
async fn transfer_success_returns_receipt() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/api/wallet/transfer")
        .with_status(200)
        .with_body(r#"{"status":"success","transaction":"tx_1"}"#)
        .create_async()
        .await;

    let request = TransferRequest::from_wallet(&wallet(), "addr_bob", 10);
    let receipt = client_for(&server).transfer(&request).await.unwrap();
    assert_eq!(receipt["transaction"], "tx_1");
}

#[tokio::test]
async fn peers_list_and_add() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", "/api/peers")
        .with_status(200)
        .with_body(r#"{"peers":["ws://a:8765","ws://b:8765"]}"#)
        .create_async()
        .await;
    let add = server
        .mock("POST", "/api/peers")
        .match_body(Matcher::Json(json!({"peer_url": "ws://c:8765"})))
        .with_status(200)
        .with_body(r#"{"status":"success"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let peers = client.get_peers().await.unwrap();
    assert_eq!(peers, vec!["ws://a:8765", "ws://b:8765"]);

    let listed: Vec<sierpinski_api_client::PeerData> = peers
        .into_iter()
        .map(sierpinski_api_client::PeerData::listed)
        .collect();
    assert!(listed.iter().all(|p| p.status == PeerStatus::Connected));

    client.add_peer("ws://c:8765").await.unwrap();
    add.assert_async().await;
}

#[tokio::test]
async fn ledger_and_chain_validation() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _ledger = server
        .mock("GET", "/api/ledger")
        .with_status(200)
        .with_body(
            json!({
                "ledger": [
                    [{"position": [0, 0], "transaction_hash": "genesis", "prev_hash": "", "timestamp": 1}],
                    [{"position": [1, 0], "transaction_hash": "b1", "prev_hash": "genesis", "timestamp": 2},
                     {"position": [1, 1], "transaction_hash": "b2", "prev_hash": "genesis", "timestamp": 3}]
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _chain = server
        .mock("POST", "/api/chain/validate")
        .with_status(200)
        .with_body(r#"{"height":3,"last_block_hash":"b2","valid":true}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let ledger = client.get_ledger().await.unwrap();
    let latest = latest_blocks(&ledger, LATEST_BLOCKS);
    let hashes: Vec<&str> = latest.iter().map(|b| b.transaction_hash.as_str()).collect();
    assert_eq!(hashes, vec!["b1", "b2", "genesis"]);
    assert_eq!(latest[2].previous(), None);

    let chain = client.validate_chain().await.unwrap();
    assert_eq!(chain.height, 3);
    assert!(chain.is_valid);
}

#[tokio::test]
async fn stats_partial_body_decodes() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/api/stats")
        .with_status(200)
        .with_body(r#"{"blocksFound":4,"total_blocks":9,"difficulty":5}"#)
        .create_async()
        .await;

    let update = client_for(&server).get_stats().await.unwrap();
    assert_eq!(update.blocks_found, Some(4.0));
    assert_eq!(update.total_blocks, Some(9.0));
    assert_eq!(update.hash_rate, None);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let port = match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener.local_addr().unwrap().port(),
        Err(_) => return,
    };
    let client = ApiClient::new(&format!("http://127.0.0.1:{port}")).unwrap();

    let err = client.get_token().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!err.is_server_response());
}
