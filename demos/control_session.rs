use std::time::Duration;
use relay_socket::{
    Callbacks, ConnectionStatus, DirectionKey, SocketClient, SocketClientOptions,
};

/// Drives a control session against a running backend
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing to see logs
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // RELAY_ENDPOINT wins; otherwise the endpoint is built from host and session
    let endpoint = match std::env::var("RELAY_ENDPOINT") {
        Ok(endpoint) => endpoint,
        Err(_) => {
            let host = std::env::var("RELAY_HOST").unwrap_or_else(|_| "localhost:8000".to_string());
            let session =
                std::env::var("RELAY_SESSION_ID").expect("RELAY_SESSION_ID must be set in .env");
            let secure = std::env::var("RELAY_SECURE").is_ok_and(|v| v == "1" || v == "true");
            relay_socket::session_endpoint(&host, &session, secure)?.to_string()
        }
    };

    println!("📡 Connecting to: {}\n", endpoint);

    let client = SocketClient::builder(SocketClientOptions::new(endpoint))?
        .callbacks(
            Callbacks::new()
                .on_open(|open| println!("✅ Opened {}", open.endpoint))
                .on_message(|message| println!("📨 {:?}", message))
                .on_close(|close| println!("🔌 Closed ({:?}) {}", close.code, close.reason))
                .on_error(|error| println!("❌ {}", error))
                .on_status_change(|status| println!("🔄 Status: {}", status))
                .on_reconnect(|attempt| println!("⏳ Reconnect attempt {}", attempt)),
        )
        .build();

    // Sent before the connection opens, so it waits in the queue
    client.send_action(DirectionKey::W);
    println!("Queued before connect: {}", client.queued_messages().await);

    client.connect();

    let mut status = client.watch_status();
    tokio::time::timeout(
        Duration::from_secs(15),
        status.wait_for(|s| *s == ConnectionStatus::Connected),
    )
    .await??;

    for key in ["d", "s", "a", "ArrowUp"] {
        if let Some(direction) = DirectionKey::from_key(key) {
            println!("➡️  Sending {}", direction);
            client.send_action(direction);
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    println!("\nPress Ctrl+C to disconnect (interrupt your network to watch reconnects)");
    tokio::signal::ctrl_c().await?;

    client.disconnect();
    tokio::time::sleep(Duration::from_millis(100)).await;
    println!("Disconnected: {}", client.status());

    Ok(())
}
