//! # Meridian Trade SDK
//!
//! A standalone Rust SDK for the Meridian perpetuals DEX REST API.
//!
//! ## Features
//!
//! - Place and cancel perpetual orders, with optional take-profit/stop-loss legs
//! - Query account, position, and open-order state
//! - Deterministic order signing with an ed25519 trading keypair
//! - Human-readable decimal inputs with lossless fixed-point conversion
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meridian_trade_sdk::{
//!     ClientConfig, MeridianClient, OrderIntent, Side, TradingKeypair, TriggerSpec,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Import the trading key
//!     let keypair = TradingKeypair::from_base58_secret(&std::env::var("MERIDIAN_SECRET_KEY")?)?;
//!
//!     // Initialize the client against testnet
//!     let client = MeridianClient::new(keypair, ClientConfig::testnet())?;
//!
//!     // Open a long with a stop-loss attached
//!     let intent = OrderIntent::market("BTC-PERP", "0xabc", Side::Buy, "0.01", "10")
//!         .with_stop_loss(TriggerSpec::market("60000"));
//!     let ack = client.place_order(&intent).await?;
//!     println!("Order placed: {:?}", ack.order_hash);
//!
//!     // Inspect open state
//!     let positions = client.get_positions(Some("BTC-PERP")).await?;
//!     println!("{} open position(s)", positions.len());
//!
//!     Ok(())
//! }
//! ```

// Internal modules
mod client;
mod config;
mod error;
mod keypair;
mod numeric;
mod signing;
mod transport;
mod types;

// Re-export public API
pub use client::MeridianClient;
pub use config::{ClientConfig, Network, DEFAULT_TIMEOUT};
pub use error::{Result, SdkError};
pub use keypair::TradingKeypair;
pub use numeric::{from_fixed_point, parse_decimal, to_fixed_point, FIXED_POINT_DECIMALS};
pub use signing::{CanonicalOrder, SignedCancel, SignedLeg, SignedOrderBundle, TriggerLeg};
pub use transport::{Envelope, FormBody, HttpClient, ListPayload};
pub use types::{
    // Enums
    OrderType,
    Side,
    // Order types
    CancelAck,
    OrderAck,
    OrderIntent,
    TriggerSpec,
    // Account types
    AccountInfo,
    OpenOrder,
    Position,
};
