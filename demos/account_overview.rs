//! Print the account's balance summary and open positions.
//!
//! Usage:
//!   MERIDIAN_SECRET_KEY=<base58 secret> cargo run --example account_overview

use meridian_trade_sdk::{ClientConfig, MeridianClient, TradingKeypair};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let secret = std::env::var("MERIDIAN_SECRET_KEY")?;
    let keypair = TradingKeypair::from_base58_secret(&secret)?;
    let client = MeridianClient::new(keypair, ClientConfig::testnet())?;

    let info = client.get_account_info().await?;
    println!("Account {}", client.address());
    println!("  equity:            {}", info.equity);
    println!("  balance:           {}", info.balance);
    println!("  available balance: {}", info.available_balance);
    println!("  unrealized pnl:    {}", info.unrealized_pnl);

    let positions = client.get_positions(None).await?;
    println!("{} open position(s)", positions.len());
    for position in &positions {
        println!(
            "  {} {} {} entry={} mark={} upnl={}",
            position.side.as_deref().unwrap_or("?"),
            position.quantity,
            position.symbol,
            position.entry_price,
            position.mark_price,
            position.unrealized_pnl
        );
    }

    Ok(())
}
