//! Order and cancel message construction and signing.
//!
//! Every leg (main, take-profit, stop-loss) becomes one canonical order
//! structure that is Borsh-serialized behind a domain prefix, SHA-256 hashed,
//! hex-encoded, and signed with the trading keypair. The venue verifies the
//! same pipeline server-side, so field order and the always-constant flags
//! must not change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use borsh::BorshSerialize;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::error::{Result, SdkError};
use crate::keypair::TradingKeypair;
use crate::numeric::{decimal_to_fixed_point, parse_decimal};
use crate::types::{OrderIntent, OrderType, Side, TriggerSpec};

// =============================================================================
// Signing prefixes (must match server)
// =============================================================================

const ORDER_MESSAGE_PREFIX: &[u8] = b"MERIDIAN_PERP_ORDER:";
const CANCEL_MESSAGE_PREFIX: &[u8] = b"MERIDIAN_PERP_CANCEL:";

// =============================================================================
// Canonical structures (Borsh layout MUST match server exactly)
// =============================================================================

/// The canonical order message, one per signed leg.
///
/// Immutable once built; signed exactly once. `post_only`, `orderbook_only`,
/// `ioc`, and `expiration` are fixed by the venue's order route and never
/// vary from the values set in [`CanonicalOrder::new`].
#[derive(Debug, Clone, BorshSerialize)]
pub struct CanonicalOrder {
    pub market: String,
    pub creator: String,
    pub is_long: bool,
    pub reduce_only: bool,
    pub post_only: bool,
    pub orderbook_only: bool,
    pub ioc: bool,
    pub quantity: u128,
    pub price: u128,
    pub leverage: u128,
    pub expiration: u64,
    pub salt: u64,
}

impl CanonicalOrder {
    #[allow(clippy::too_many_arguments)]
    fn new(
        market: &str,
        creator: &str,
        is_long: bool,
        reduce_only: bool,
        quantity: u128,
        price: u128,
        leverage: u128,
        salt: u64,
    ) -> Self {
        Self {
            market: market.to_string(),
            creator: creator.to_string(),
            is_long,
            reduce_only,
            post_only: false,
            orderbook_only: true,
            ioc: false,
            quantity,
            price,
            leverage,
            expiration: 0,
            salt,
        }
    }
}

/// Canonical cancellation message: the acting owner plus the exact list of
/// order hashes to cancel.
#[derive(Debug, Clone, BorshSerialize)]
struct CancelMessage {
    owner: String,
    order_hashes: Vec<String>,
}

// =============================================================================
// Signed outputs
// =============================================================================

/// One signed leg ready for submission.
#[derive(Debug, Clone)]
pub struct SignedLeg {
    pub order: CanonicalOrder,
    pub salt: u64,
    pub signature: String,
}

/// A signed trigger leg plus the resolved wire-level fields the facade
/// forwards alongside it.
#[derive(Debug, Clone)]
pub struct TriggerLeg {
    pub leg: SignedLeg,
    pub trigger_price: Decimal,
    pub order_type: OrderType,
    /// Resolved order price; present iff the trigger fires a LIMIT order.
    pub order_price: Option<Decimal>,
}

/// Everything `place_order` needs: the signed legs plus the normalized
/// decimal fields that travel in the form body.
#[derive(Debug, Clone)]
pub struct SignedOrderBundle {
    pub main: SignedLeg,
    pub take_profit: Option<TriggerLeg>,
    pub stop_loss: Option<TriggerLeg>,
    pub quantity: Decimal,
    /// None for MARKET orders (wire price field is the empty string).
    pub price: Option<Decimal>,
    pub leverage: Decimal,
}

/// A signed cancellation ready for submission.
#[derive(Debug, Clone)]
pub struct SignedCancel {
    pub symbol: String,
    pub order_hashes: Vec<String>,
    pub acting_address: String,
    pub signature: String,
}

// =============================================================================
// Salt generation
// =============================================================================

// Floor advances by 3 per bundle so the +1/+2 trigger offsets can never
// collide with the next call, even within the same millisecond.
static SALT_FLOOR: AtomicU64 = AtomicU64::new(0);

fn next_base_salt() -> u64 {
    let now_millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut observed = SALT_FLOOR.load(Ordering::Relaxed);
    loop {
        let candidate = now_millis.max(observed.saturating_add(3));
        match SALT_FLOOR.compare_exchange_weak(
            observed,
            candidate,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(current) => observed = current,
        }
    }
}

// =============================================================================
// Signing pipeline
// =============================================================================

/// PREFIX + Borsh(order) -> SHA256 -> hex string -> signed as UTF-8 bytes.
fn sign_order(keypair: &TradingKeypair, order: CanonicalOrder) -> Result<SignedLeg> {
    let borsh_bytes = order
        .try_to_vec()
        .map_err(|e| SdkError::Signing(format!("Borsh serialization failed: {}", e)))?;

    let mut data = ORDER_MESSAGE_PREFIX.to_vec();
    data.extend(borsh_bytes);

    let digest_hex = hex::encode(Sha256::digest(&data));
    tracing::debug!("Order message digest: {}", digest_hex);

    let signature = keypair.sign_hex(digest_hex.as_bytes());
    let salt = order.salt;

    Ok(SignedLeg {
        order,
        salt,
        signature,
    })
}

/// Sign a cancellation over the exact identifier list.
pub fn sign_cancel(
    keypair: &TradingKeypair,
    symbol: &str,
    order_hashes: &[String],
    acting_address: Option<&str>,
) -> Result<SignedCancel> {
    if symbol.trim().is_empty() {
        return Err(SdkError::Validation("symbol is required".to_string()));
    }
    if order_hashes.is_empty() {
        return Err(SdkError::Validation(
            "at least one order hash is required".to_string(),
        ));
    }

    let acting_address = acting_address.unwrap_or_else(|| keypair.address()).to_string();

    let message = CancelMessage {
        owner: acting_address.clone(),
        order_hashes: order_hashes.to_vec(),
    };
    let borsh_bytes = message
        .try_to_vec()
        .map_err(|e| SdkError::Signing(format!("Borsh serialization failed: {}", e)))?;

    let mut data = CANCEL_MESSAGE_PREFIX.to_vec();
    data.extend(borsh_bytes);

    let digest_hex = hex::encode(Sha256::digest(&data));
    let signature = keypair.sign_hex(digest_hex.as_bytes());

    Ok(SignedCancel {
        symbol: symbol.to_string(),
        order_hashes: order_hashes.to_vec(),
        acting_address,
        signature,
    })
}

// =============================================================================
// Order bundle construction
// =============================================================================

/// Validate an intent, normalize its numeric fields, and sign every leg.
///
/// The main leg takes the base salt; a take-profit leg takes base+1 and a
/// stop-loss leg base+2, so the three are always distinct. Trigger legs are
/// reduce-only and on the opposite side from the main order.
pub fn build_and_sign(keypair: &TradingKeypair, intent: &OrderIntent) -> Result<SignedOrderBundle> {
    validate_intent(intent)?;

    let quantity = parse_decimal(&intent.quantity)?;
    let leverage = parse_decimal(&intent.leverage)?;
    let price = match (intent.order_type, intent.price.as_deref()) {
        (OrderType::Limit, Some(p)) => Some(parse_decimal(p)?),
        // Price is meaningless for MARKET; force the zero fixed-point value
        _ => None,
    };

    let quantity_fp = decimal_to_fixed_point(quantity)?;
    let leverage_fp = decimal_to_fixed_point(leverage)?;
    let price_fp = match price {
        Some(p) => decimal_to_fixed_point(p)?,
        None => 0,
    };

    let base_salt = next_base_salt();
    let is_long = intent.side == Side::Buy;

    let main = sign_order(
        keypair,
        CanonicalOrder::new(
            &intent.market,
            keypair.address(),
            is_long,
            intent.reduce_only,
            quantity_fp,
            price_fp,
            leverage_fp,
            base_salt,
        ),
    )?;

    let take_profit = intent
        .take_profit
        .as_ref()
        .map(|spec| build_trigger_leg(keypair, intent, spec, quantity_fp, leverage_fp, base_salt + 1))
        .transpose()?;

    let stop_loss = intent
        .stop_loss
        .as_ref()
        .map(|spec| build_trigger_leg(keypair, intent, spec, quantity_fp, leverage_fp, base_salt + 2))
        .transpose()?;

    Ok(SignedOrderBundle {
        main,
        take_profit,
        stop_loss,
        quantity,
        price,
        leverage,
    })
}

fn validate_intent(intent: &OrderIntent) -> Result<()> {
    if intent.symbol.trim().is_empty() {
        return Err(SdkError::Validation("symbol is required".to_string()));
    }
    if intent.market.trim().is_empty() {
        return Err(SdkError::Validation("market id is required".to_string()));
    }
    if intent.quantity.trim().is_empty() {
        return Err(SdkError::Validation("quantity is required".to_string()));
    }
    if intent.leverage.trim().is_empty() {
        return Err(SdkError::Validation("leverage is required".to_string()));
    }
    if intent.order_type == OrderType::Limit
        && intent.price.as_deref().map_or(true, |p| p.trim().is_empty())
    {
        return Err(SdkError::Validation(
            "price is required for LIMIT orders".to_string(),
        ));
    }
    Ok(())
}

/// A trigger leg mirrors the main order's quantity and leverage, flips the
/// direction, and is always reduce-only.
fn build_trigger_leg(
    keypair: &TradingKeypair,
    intent: &OrderIntent,
    spec: &TriggerSpec,
    quantity_fp: u128,
    leverage_fp: u128,
    salt: u64,
) -> Result<TriggerLeg> {
    let trigger_price = parse_decimal(&spec.trigger_price)?;
    let order_type = spec.order_type.unwrap_or(OrderType::Market);

    let order_price = match order_type {
        OrderType::Market => None,
        OrderType::Limit => Some(match spec.order_price.as_deref() {
            Some(p) => parse_decimal(p)?,
            None => trigger_price,
        }),
    };
    let price_fp = match order_price {
        Some(p) => decimal_to_fixed_point(p)?,
        None => 0,
    };

    let is_long = intent.side.opposite() == Side::Buy;

    let leg = sign_order(
        keypair,
        CanonicalOrder::new(
            &intent.market,
            keypair.address(),
            is_long,
            true,
            quantity_fp,
            price_fp,
            leverage_fp,
            salt,
        ),
    )?;

    Ok(TriggerLeg {
        leg,
        trigger_price,
        order_type,
        order_price,
    })
}
