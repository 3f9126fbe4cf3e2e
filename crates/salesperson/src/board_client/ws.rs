//! WebSocket client for the live board.

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// `ws://host/ws` + id -> `ws://host/ws/{id}`.
pub fn channel_url(ws_url: &str, client_id: i64) -> String {
    format!("{}/{}", ws_url.trim_end_matches('/'), client_id)
}

/// Print board events to stdout and send each non-empty stdin line as a sale.
/// Returns when the server closes the channel or stdin ends.
pub async fn run_ws_client(ws_url: &str, client_id: i64) -> Result<()> {
    let url = channel_url(ws_url, client_id);
    let (ws, _) = connect_async(url.as_str()).await?;
    tracing::info!("Joined board as salesperson #{}", client_id);
    let (mut ws_tx, mut ws_rx) = ws.split();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            msg = ws_rx.next() => match msg {
                Some(Ok(Message::Text(t))) => println!("{}", t),
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Board closed the connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => ws_tx.send(Message::Text(line)).await?,
                None => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            },
        }
    }

    Ok(())
}
