//! Sales board client.

use std::env;

use clap::Parser;
use salesperson::{board_client, cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let board_url = env::var("BOARD_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

    match cli.command {
        cli::Commands::Join { client_id } => {
            let ws_url =
                env::var("BOARD_WS_URL").unwrap_or_else(|_| "ws://localhost:8080/ws".to_string());
            board_client::ws::run_ws_client(&ws_url, client_id).await?;
        }
        cli::Commands::Report { message } => {
            let username = env::var("BOARD_USERNAME")
                .map_err(|_| anyhow::anyhow!("BOARD_USERNAME required"))?;
            let password = env::var("BOARD_PASSWORD")
                .map_err(|_| anyhow::anyhow!("BOARD_PASSWORD required"))?;
            let token = board_client::login(&board_url, &username, &password).await?;
            let message = cli::Commands::report_message(&message);
            let event = board_client::report_sale(&board_url, &token, &message).await?;
            println!("{}", event);
        }
        cli::Commands::History => {
            for event in board_client::fetch_history(&board_url).await? {
                println!("{}", event);
            }
        }
    }

    Ok(())
}
