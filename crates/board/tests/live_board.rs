//! End-to-end: real listener, real WebSocket clients.

use std::net::SocketAddr;
use std::time::Duration;

use board::api::{router, AppState};
use board::config::{AuthMode, Config};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_board() -> (SocketAddr, AppState) {
    let state = AppState::from_config(Config::for_test(AuthMode::Placeholder, &[("johndoe", "secret")]))
        .unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

async fn join(addr: SocketAddr, client_id: i64) -> Client {
    let (ws, _) = connect_async(format!("ws://{}/ws/{}", addr, client_id))
        .await
        .unwrap();
    ws
}

/// Next text frame, skipping pings. Panics after 5s.
async fn next_text(ws: &mut Client) -> String {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(t))) => return t,
                Some(Ok(_)) => continue,
                other => panic!("stream ended: {:?}", other),
            }
        }
    })
    .await
    .expect("timed out waiting for text frame")
}

/// Text frames received until the connection ends or goes quiet.
async fn remaining_texts(ws: &mut Client) -> Vec<String> {
    let mut texts = Vec::new();
    while let Ok(Some(Ok(msg))) = tokio::time::timeout(Duration::from_millis(300), ws.next()).await {
        match msg {
            Message::Text(t) => texts.push(t),
            Message::Close(_) => break,
            _ => {}
        }
    }
    texts
}

async fn wait_for_connections(state: &AppState, n: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while state.board.connection_count() != n {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("connection count never settled");
}

#[tokio::test]
async fn sale_replay_and_departure() {
    let (addr, state) = spawn_board().await;

    let mut one = join(addr, 1).await;
    one.send(Message::Text("5 units".to_string())).await.unwrap();
    assert_eq!(next_text(&mut one).await, "Salesperson #1 reports a sale: 5 units");

    let mut two = join(addr, 2).await;
    assert_eq!(next_text(&mut two).await, "Salesperson #1 reports a sale: 5 units");

    one.close(None).await.unwrap();
    assert_eq!(next_text(&mut two).await, "Salesperson #1 left the board.");
    assert!(remaining_texts(&mut one)
        .await
        .iter()
        .all(|t| !t.contains("left the board")));

    wait_for_connections(&state, 1).await;
    assert_eq!(
        state.board.history(),
        vec!["Salesperson #1 reports a sale: 5 units"]
    );
}

#[tokio::test]
async fn every_client_sees_the_same_order() {
    let (addr, state) = spawn_board().await;
    let mut clients = Vec::new();
    for id in 1..=3 {
        clients.push(join(addr, id).await);
    }
    wait_for_connections(&state, 3).await;

    for (i, client) in clients.iter_mut().enumerate() {
        client
            .send(Message::Text(format!("{} units", i)))
            .await
            .unwrap();
    }
    state.board.report_sale("walk-in");

    let history = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let h = state.board.history();
            if h.len() == 4 {
                return h;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    for client in clients.iter_mut() {
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(next_text(client).await);
        }
        assert_eq!(seen, history);
    }
}

#[tokio::test]
async fn same_salesperson_twice_is_two_channels() {
    let (addr, state) = spawn_board().await;
    let mut first = join(addr, 7).await;
    let mut second = join(addr, 7).await;
    wait_for_connections(&state, 2).await;

    first.send(Message::Text("1 crate".to_string())).await.unwrap();
    assert_eq!(next_text(&mut first).await, "Salesperson #7 reports a sale: 1 crate");
    assert_eq!(next_text(&mut second).await, "Salesperson #7 reports a sale: 1 crate");

    first.close(None).await.unwrap();
    assert_eq!(next_text(&mut second).await, "Salesperson #7 left the board.");
    wait_for_connections(&state, 1).await;
}

#[tokio::test]
async fn abrupt_drop_still_announces_departure() {
    let (addr, state) = spawn_board().await;
    let one = join(addr, 1).await;
    let mut two = join(addr, 2).await;
    wait_for_connections(&state, 2).await;

    drop(one);
    assert_eq!(next_text(&mut two).await, "Salesperson #1 left the board.");
    wait_for_connections(&state, 1).await;
}
