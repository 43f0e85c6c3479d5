//! Main MeridianClient facade for the SDK.
//!
//! Provides a unified interface for all trading operations.

use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::keypair::TradingKeypair;
use crate::signing::{build_and_sign, sign_cancel, SignedOrderBundle, TriggerLeg};
use crate::transport::{FormBody, HttpClient, ListPayload};
use crate::types::{AccountInfo, CancelAck, OpenOrder, OrderAck, OrderIntent, Position};

const PLACE_ORDER_PATH: &str = "/api/v1/order/place";
const CANCEL_ORDER_PATH: &str = "/api/v1/order/cancel";
const ACCOUNT_INFO_PATH: &str = "/api/v1/account/info";
const POSITIONS_PATH: &str = "/api/v1/account/positions";
const OPEN_ORDERS_PATH: &str = "/api/v1/order/open";

/// Trigger fires off the oracle price whenever TP/SL legs ride along.
const TRIGGER_WAY_ORACLE: &str = "oracle";

/// The main Meridian Trade SDK client.
///
/// Provides methods for:
/// - Placing and cancelling perpetual orders
/// - Querying account, position, and open-order state
///
/// Configuration and identity are fixed at construction. The only mutable
/// state is the optional auth token; see [`MeridianClient::set_auth_token`].
pub struct MeridianClient {
    keypair: TradingKeypair,
    http: HttpClient,
    #[allow(dead_code)]
    config: ClientConfig,
}

impl MeridianClient {
    /// Create a new MeridianClient with the given keypair and configuration.
    pub fn new(keypair: TradingKeypair, config: ClientConfig) -> Result<Self> {
        let http = HttpClient::new(
            &config.resolved_api_url(),
            keypair.address(),
            config.timeout,
        )?;

        info!("MeridianClient initialized for address: {}", keypair.address());

        Ok(Self {
            keypair,
            http,
            config,
        })
    }

    /// The caller's wallet address.
    pub fn address(&self) -> &str {
        self.keypair.address()
    }

    /// Set or clear the bearer auth token attached to subsequent requests.
    /// Not thread-safe for rotation while requests are in flight.
    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.http.set_auth_token(token);
    }

    // =========================================================================
    // Trading operations
    // =========================================================================

    /// Place a perpetual order, with optional take-profit/stop-loss legs.
    ///
    /// This method:
    /// 1. Validates the intent and normalizes its decimal fields
    /// 2. Builds and signs the canonical order message per leg
    /// 3. Submits the form-encoded payload
    pub async fn place_order(&self, intent: &OrderIntent) -> Result<OrderAck> {
        let bundle = build_and_sign(&self.keypair, intent)?;
        let form = build_place_form(self.address(), intent, &bundle)?;

        info!(
            "Placing {} {} order: symbol={}, qty={}, leverage={}x, salt={}",
            intent.side, intent.order_type, intent.symbol, bundle.quantity, bundle.leverage,
            bundle.main.salt
        );
        debug!("Place order form: {:?}", form);

        let ack: OrderAck = self
            .http
            .post_form(PLACE_ORDER_PATH, &form)
            .await?
            .into_data_or_default()?;

        info!(
            "Order accepted, hash: {}",
            ack.order_hash.as_deref().unwrap_or("<pending>")
        );

        Ok(ack)
    }

    /// Cancel one or more orders by hash.
    ///
    /// `on_behalf_of` lets a parent account cancel a sub-account's orders;
    /// it defaults to the caller's own address.
    pub async fn cancel_order(
        &self,
        symbol: &str,
        order_hashes: &[String],
        on_behalf_of: Option<&str>,
    ) -> Result<CancelAck> {
        let signed = sign_cancel(&self.keypair, symbol, order_hashes, on_behalf_of)?;

        let form = FormBody::new()
            .field("symbol", signed.symbol.as_str())
            .json_field("orderHashes", &signed.order_hashes)?
            .field("signature", signed.signature.as_str())
            .field("parentAddress", signed.acting_address.as_str());

        info!(
            "Cancelling {} order(s) on {} for {}",
            signed.order_hashes.len(),
            signed.symbol,
            signed.acting_address
        );

        self.http
            .post_form(CANCEL_ORDER_PATH, &form)
            .await?
            .into_data_or_default()
    }

    // =========================================================================
    // Read operations
    // =========================================================================

    /// Get the account's balance and margin summary. A success envelope
    /// with no payload yields the all-zero summary of a fresh account.
    pub async fn get_account_info(&self) -> Result<AccountInfo> {
        self.http
            .get(ACCOUNT_INFO_PATH, &[])
            .await?
            .into_data_or_default()
    }

    /// Get open positions, optionally filtered by symbol.
    pub async fn get_positions(&self, symbol: Option<&str>) -> Result<Vec<Position>> {
        let query = symbol_query(symbol);
        let payload: ListPayload<Position> = self
            .http
            .get(POSITIONS_PATH, &query)
            .await?
            .into_data_or_default()?;
        Ok(payload.into_vec())
    }

    /// Get resting orders, optionally filtered by symbol.
    pub async fn get_open_orders(&self, symbol: Option<&str>) -> Result<Vec<OpenOrder>> {
        let query = symbol_query(symbol);
        let payload: ListPayload<OpenOrder> = self
            .http
            .get(OPEN_ORDERS_PATH, &query)
            .await?
            .into_data_or_default()?;
        Ok(payload.into_vec())
    }
}

fn symbol_query(symbol: Option<&str>) -> Vec<(&'static str, &str)> {
    match symbol {
        Some(s) => vec![("symbol", s)],
        None => Vec::new(),
    }
}

/// Assemble the place-order form: normalized decimal strings plus the
/// per-leg salts and signatures. MARKET orders send an empty price field.
fn build_place_form(
    address: &str,
    intent: &OrderIntent,
    bundle: &SignedOrderBundle,
) -> Result<FormBody> {
    let price_field = match bundle.price {
        Some(price) => price.normalize().to_string(),
        None => String::new(),
    };
    let client_id = intent
        .client_id
        .clone()
        .unwrap_or_else(|| format!("mts-{}", bundle.main.salt));

    let mut form = FormBody::new()
        .field("symbol", intent.symbol.as_str())
        .field("side", intent.side.as_str())
        .field("orderType", intent.order_type.as_str())
        .field("quantity", bundle.quantity.normalize().to_string())
        .field("price", price_field)
        .field("leverage", bundle.leverage.normalize().to_string())
        .field("salt", bundle.main.salt.to_string())
        .field("creator", address)
        .field("clientId", client_id)
        .field("reduceOnly", if intent.reduce_only { "true" } else { "false" })
        .field("orderSignature", bundle.main.signature.as_str());

    if let Some(tp) = &bundle.take_profit {
        form = trigger_fields(form, "tp", tp).field("triggerWay", TRIGGER_WAY_ORACLE);
    }
    if let Some(sl) = &bundle.stop_loss {
        form = trigger_fields(form, "sl", sl);
    }

    Ok(form)
}

fn trigger_fields(form: FormBody, prefix: &str, leg: &TriggerLeg) -> FormBody {
    form.field(
        &format!("{}TriggerPrice", prefix),
        leg.trigger_price.normalize().to_string(),
    )
    .field(&format!("{}OrderType", prefix), leg.order_type.as_str())
    .opt_field(
        &format!("{}OrderPrice", prefix),
        leg.order_price.map(|p| p.normalize().to_string()),
    )
    .field(&format!("{}Salt", prefix), leg.leg.salt.to_string())
    .field(&format!("{}OrderSignature", prefix), leg.leg.signature.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::SdkError;
    use crate::types::{OrderType, Side, TriggerSpec};

    fn test_client() -> MeridianClient {
        MeridianClient::new(TradingKeypair::generate(), ClientConfig::testnet()).unwrap()
    }

    fn market_buy() -> OrderIntent {
        OrderIntent::market("BTC-PERP", "0xabc", Side::Buy, "0.01", "10")
    }

    #[test]
    fn test_market_order_form_has_empty_price() {
        let client = test_client();
        let intent = market_buy();
        let bundle = build_and_sign(&client.keypair, &intent).unwrap();
        let form = build_place_form(client.address(), &intent, &bundle).unwrap();

        assert_eq!(form.get("price"), Some(""));
        assert_eq!(form.get("quantity"), Some("0.01"));
        assert_eq!(form.get("side"), Some("BUY"));
        assert_eq!(form.get("orderType"), Some("MARKET"));
        assert_eq!(form.get("leverage"), Some("10"));
        assert_eq!(form.get("reduceOnly"), Some("false"));
        assert_eq!(form.get("creator"), Some(client.address()));
        assert_eq!(form.get("salt"), Some(bundle.main.salt.to_string().as_str()));
        assert_eq!(form.get("triggerWay"), None);
        assert_eq!(form.get("tpSalt"), None);
    }

    #[test]
    fn test_trigger_fields_and_oracle_flag() {
        let client = test_client();
        let intent = market_buy()
            .with_take_profit(TriggerSpec::limit("70000", "69500"))
            .with_stop_loss(TriggerSpec::market("60000"));
        let bundle = build_and_sign(&client.keypair, &intent).unwrap();
        let form = build_place_form(client.address(), &intent, &bundle).unwrap();

        assert_eq!(form.get("triggerWay"), Some("oracle"));
        assert_eq!(form.get("tpTriggerPrice"), Some("70000"));
        assert_eq!(form.get("tpOrderType"), Some("LIMIT"));
        assert_eq!(form.get("tpOrderPrice"), Some("69500"));
        assert_eq!(form.get("slTriggerPrice"), Some("60000"));
        assert_eq!(form.get("slOrderType"), Some("MARKET"));
        // MARKET stop-loss carries no order price field at all
        assert_eq!(form.get("slOrderPrice"), None);
        assert_eq!(
            form.get("tpSalt"),
            Some((bundle.main.salt + 1).to_string().as_str())
        );
        assert_eq!(
            form.get("slSalt"),
            Some((bundle.main.salt + 2).to_string().as_str())
        );
    }

    #[test]
    fn test_sl_only_has_no_trigger_way() {
        let client = test_client();
        let intent = market_buy().with_stop_loss(TriggerSpec::market("60000"));
        let bundle = build_and_sign(&client.keypair, &intent).unwrap();
        let form = build_place_form(client.address(), &intent, &bundle).unwrap();

        assert_eq!(form.get("triggerWay"), None);
        assert!(form.get("slSalt").is_some());
    }

    #[test]
    fn test_default_client_id_from_salt() {
        let client = test_client();
        let intent = market_buy();
        let bundle = build_and_sign(&client.keypair, &intent).unwrap();
        let form = build_place_form(client.address(), &intent, &bundle).unwrap();
        assert_eq!(
            form.get("clientId"),
            Some(format!("mts-{}", bundle.main.salt).as_str())
        );

        let intent = market_buy().with_client_id("corr-42");
        let bundle = build_and_sign(&client.keypair, &intent).unwrap();
        let form = build_place_form(client.address(), &intent, &bundle).unwrap();
        assert_eq!(form.get("clientId"), Some("corr-42"));
    }

    #[tokio::test]
    async fn test_cancel_empty_list_fails_before_network() {
        let client = test_client();
        let err = client.cancel_order("BTC-PERP", &[], None).await.unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }

    #[tokio::test]
    async fn test_place_limit_without_price_fails_before_network() {
        let client = test_client();
        let mut intent = market_buy();
        intent.order_type = OrderType::Limit;
        let err = client.place_order(&intent).await.unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }
}
