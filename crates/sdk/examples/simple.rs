//! Simple SDK Example
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    RELAY__QUEUE_NAMES=orders cargo run --package relay-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --example simple
//!    ```

use relay_sdk::RelayClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = RelayClient::connect("http://127.0.0.1:9527").await?;

    let sub = client
        .subscribe("orders", "http://127.0.0.1:8080/hook")
        .await?;
    println!("subscribed {} on {}", sub.callback, sub.queue);

    for i in 0..3 {
        match client.push("orders", format!(r#"{{"order_id":{}}}"#, i)).await {
            Ok(resp) => println!("pushed #{} to {}", i, resp.queue),
            Err(e) if e.is_queue_overflow() => println!("queue full, dropped #{}", i),
            Err(e) => return Err(e.into()),
        }
    }

    let stats = client.stats().await?;
    for q in stats.queues {
        println!(
            "{}: {}/{} pending, {} subscribers",
            q.name, q.pending, q.capacity, q.subscribers
        );
    }

    Ok(())
}
