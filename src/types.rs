use std::fmt;

use serde::Deserialize;

// =============================================================================
// Order enums
// =============================================================================

/// Side of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Wire form used in form fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order intent (caller-supplied, transient)
// =============================================================================

/// Trigger specification for a take-profit or stop-loss companion leg.
///
/// A leg exists iff a trigger price was supplied; when present it is always
/// reduce-only and on the opposite side from the main order.
#[derive(Debug, Clone)]
pub struct TriggerSpec {
    /// Price at which the trigger fires (decimal string).
    pub trigger_price: String,
    /// Order type of the triggered order; defaults to MARKET when absent.
    pub order_type: Option<OrderType>,
    /// Explicit order price for a LIMIT trigger; falls back to the trigger
    /// price when absent.
    pub order_price: Option<String>,
}

impl TriggerSpec {
    /// Trigger that fires a market order.
    pub fn market(trigger_price: impl Into<String>) -> Self {
        Self {
            trigger_price: trigger_price.into(),
            order_type: Some(OrderType::Market),
            order_price: None,
        }
    }

    /// Trigger that fires a limit order at the given price.
    pub fn limit(trigger_price: impl Into<String>, order_price: impl Into<String>) -> Self {
        Self {
            trigger_price: trigger_price.into(),
            order_type: Some(OrderType::Limit),
            order_price: Some(order_price.into()),
        }
    }
}

/// An order to be placed.
///
/// Quantity, price, and leverage are decimal strings; they are converted to
/// fixed-point only inside the signing path so no precision is lost on entry.
#[derive(Debug, Clone)]
pub struct OrderIntent {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: String,
    /// Required iff `order_type` is LIMIT.
    pub price: Option<String>,
    pub leverage: String,
    /// On-chain market identifier.
    pub market: String,
    pub reduce_only: bool,
    /// Client-supplied correlation id; generated from the salt when absent.
    pub client_id: Option<String>,
    pub take_profit: Option<TriggerSpec>,
    pub stop_loss: Option<TriggerSpec>,
}

impl OrderIntent {
    pub fn market(
        symbol: impl Into<String>,
        market: impl Into<String>,
        side: Side,
        quantity: impl Into<String>,
        leverage: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            quantity: quantity.into(),
            price: None,
            leverage: leverage.into(),
            market: market.into(),
            reduce_only: false,
            client_id: None,
            take_profit: None,
            stop_loss: None,
        }
    }

    pub fn limit(
        symbol: impl Into<String>,
        market: impl Into<String>,
        side: Side,
        quantity: impl Into<String>,
        price: impl Into<String>,
        leverage: impl Into<String>,
    ) -> Self {
        Self {
            price: Some(price.into()),
            order_type: OrderType::Limit,
            ..Self::market(symbol, market, side, quantity, leverage)
        }
    }

    pub fn reduce_only(mut self) -> Self {
        self.reduce_only = true;
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_take_profit(mut self, spec: TriggerSpec) -> Self {
        self.take_profit = Some(spec);
        self
    }

    pub fn with_stop_loss(mut self, spec: TriggerSpec) -> Self {
        self.stop_loss = Some(spec);
        self
    }
}

// =============================================================================
// Server response payloads
// =============================================================================

fn zero() -> String {
    "0".to_string()
}

/// Acknowledgement returned when an order is accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    #[serde(default)]
    pub order_hash: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub tp_order_hash: Option<String>,
    #[serde(default)]
    pub sl_order_hash: Option<String>,
}

/// Acknowledgement returned when orders are cancelled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAck {
    #[serde(default)]
    pub cancelled: Vec<String>,
}

/// Account margin and balance summary.
///
/// Numeric fields arrive as decimal strings; absent fields default to "0".
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "zero")]
    pub equity: String,
    #[serde(default = "zero")]
    pub balance: String,
    #[serde(default = "zero")]
    pub available_balance: String,
    #[serde(default = "zero")]
    pub position_margin: String,
    #[serde(default = "zero")]
    pub order_margin: String,
    #[serde(default = "zero")]
    pub unrealized_pnl: String,
}

impl Default for AccountInfo {
    /// A fresh account: no address echoed back, every numeric field "0".
    fn default() -> Self {
        Self {
            address: None,
            equity: zero(),
            balance: zero(),
            available_balance: zero(),
            position_margin: zero(),
            order_margin: zero(),
            unrealized_pnl: zero(),
        }
    }
}

/// One open position row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default = "zero")]
    pub quantity: String,
    #[serde(default = "zero")]
    pub entry_price: String,
    #[serde(default = "zero")]
    pub mark_price: String,
    #[serde(default = "zero")]
    pub leverage: String,
    #[serde(default = "zero")]
    pub unrealized_pnl: String,
    #[serde(default)]
    pub liquidation_price: Option<String>,
}

/// One resting order row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrder {
    pub order_hash: String,
    pub symbol: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default = "zero")]
    pub quantity: String,
    #[serde(default = "zero")]
    pub price: String,
    #[serde(default)]
    pub reduce_only: bool,
    #[serde(default)]
    pub created_at: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings() {
        assert_eq!(Side::Buy.as_str(), "BUY");
        assert_eq!(Side::Sell.as_str(), "SELL");
        assert_eq!(OrderType::Market.as_str(), "MARKET");
        assert_eq!(OrderType::Limit.as_str(), "LIMIT");
        assert_eq!(Side::Buy.opposite(), Side::Sell);
    }

    #[test]
    fn test_account_info_zero_defaults() {
        let info: AccountInfo = serde_json::from_str(r#"{"equity": "123.4"}"#).unwrap();
        assert_eq!(info.equity, "123.4");
        assert_eq!(info.balance, "0");
        assert_eq!(info.available_balance, "0");
        assert_eq!(info.unrealized_pnl, "0");
        assert!(info.address.is_none());
    }

    #[test]
    fn test_empty_success_envelope_yields_zeroed_account() {
        let envelope: crate::transport::Envelope<AccountInfo> =
            serde_json::from_str(r#"{"code": 200}"#).unwrap();
        let info = envelope.into_data_or_default().unwrap();
        assert!(info.address.is_none());
        assert_eq!(info.equity, "0");
        assert_eq!(info.balance, "0");
        assert_eq!(info.available_balance, "0");
        assert_eq!(info.position_margin, "0");
        assert_eq!(info.order_margin, "0");
        assert_eq!(info.unrealized_pnl, "0");
    }

    #[test]
    fn test_limit_intent_builder() {
        let intent = OrderIntent::limit("BTC-PERP", "0xabc", Side::Sell, "0.5", "65000", "5")
            .reduce_only()
            .with_client_id("corr-1");
        assert_eq!(intent.order_type, OrderType::Limit);
        assert_eq!(intent.price.as_deref(), Some("65000"));
        assert!(intent.reduce_only);
        assert_eq!(intent.client_id.as_deref(), Some("corr-1"));
    }
}
