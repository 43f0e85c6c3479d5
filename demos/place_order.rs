//! Place a small market order with a stop-loss attached, then list open orders.
//!
//! Usage:
//!   MERIDIAN_SECRET_KEY=<base58 secret> cargo run --example place_order

use meridian_trade_sdk::{
    ClientConfig, MeridianClient, OrderIntent, Side, TradingKeypair, TriggerSpec,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let secret = std::env::var("MERIDIAN_SECRET_KEY")?;
    let keypair = TradingKeypair::from_base58_secret(&secret)?;

    let client = MeridianClient::new(keypair, ClientConfig::testnet())?;
    println!("Trading as {}", client.address());

    let intent = OrderIntent::market("BTC-PERP", "0xabc", Side::Buy, "0.01", "10")
        .with_stop_loss(TriggerSpec::market("60000"));

    match client.place_order(&intent).await {
        Ok(ack) => println!("Order accepted: {:?}", ack),
        Err(err) => println!("Order rejected: {}", err),
    }

    let open = client.get_open_orders(Some("BTC-PERP")).await?;
    println!("{} open order(s)", open.len());
    for order in &open {
        println!(
            "  {} {} {} @ {} ({})",
            order.side.as_deref().unwrap_or("?"),
            order.quantity,
            order.symbol,
            order.price,
            order.order_hash
        );
    }

    Ok(())
}
