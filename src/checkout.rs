//! Checkout boundary
//!
//! The page asks a backend function for a hosted checkout session and opens
//! the returned URL. This module holds the typed request and response, the
//! product catalogue and a gateway trait so the transport stays pluggable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notify::{Notification, Notifier};

/// Errors from the checkout flow
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("unknown product tier '{0}'")]
    UnknownTier(String),
    #[error("payment provider error: {0}")]
    Provider(String),
    #[error("checkout transport failed: {0}")]
    Transport(String),
}

/// Purchasable products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductTier {
    #[default]
    GameAccess,
    BattlePass,
    Cosmetic,
}

impl ProductTier {
    pub const ALL: [ProductTier; 3] = [
        ProductTier::GameAccess,
        ProductTier::BattlePass,
        ProductTier::Cosmetic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductTier::GameAccess => "game_access",
            ProductTier::BattlePass => "battle_pass",
            ProductTier::Cosmetic => "cosmetic",
        }
    }

    /// Strict lookup by id
    pub fn parse(id: &str) -> Result<Self, CheckoutError> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == id)
            .ok_or_else(|| CheckoutError::UnknownTier(id.to_string()))
    }

    /// Unknown ids fall back to full game access
    pub fn parse_lenient(id: &str) -> Self {
        Self::parse(id).unwrap_or_default()
    }

    /// Price in US cents
    pub fn amount_cents(&self) -> u32 {
        match self {
            ProductTier::GameAccess => 4999,
            ProductTier::BattlePass => 999,
            ProductTier::Cosmetic => 299,
        }
    }

    pub fn product_name(&self) -> &'static str {
        match self {
            ProductTier::GameAccess => "Eclipse Realms - Full Game Access",
            ProductTier::BattlePass => "Eclipse Realms - Season Battle Pass",
            ProductTier::Cosmetic => "Eclipse Realms - Cosmetic Item",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProductTier::GameAccess => {
                "Unlock the full Eclipse Realms experience with all realms, characters, and features."
            }
            ProductTier::BattlePass => {
                "Access exclusive rewards, cosmetics, and challenges for the current season."
            }
            ProductTier::Cosmetic => "Premium cosmetic item for your character.",
        }
    }

    /// "$49.99"
    pub fn display_price(&self) -> String {
        let cents = self.amount_cents();
        format!("${}.{:02}", cents / 100, cents % 100)
    }
}

/// Body sent to the session endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default = "default_product_type")]
    pub product_type: String,
}

fn default_product_type() -> String {
    ProductTier::GameAccess.as_str().to_string()
}

impl CheckoutRequest {
    pub fn new(tier: ProductTier) -> Self {
        Self {
            product_type: tier.as_str().to_string(),
        }
    }

    /// Tier the server will actually charge for
    pub fn tier(&self) -> ProductTier {
        ProductTier::parse_lenient(&self.product_type)
    }
}

/// What the session endpoint answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckoutResponse {
    Session { url: String },
    Failure { error: String },
}

impl CheckoutResponse {
    pub fn into_result(self) -> Result<String, CheckoutError> {
        match self {
            CheckoutResponse::Session { url } => Ok(url),
            CheckoutResponse::Failure { error } => Err(CheckoutError::Provider(error)),
        }
    }
}

/// Everything a hosted checkout session needs for one tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionParams {
    pub product_type: ProductTier,
    pub name: &'static str,
    pub description: &'static str,
    pub unit_amount: u32,
    pub currency: &'static str,
    pub quantity: u32,
    pub success_url: String,
    pub cancel_url: String,
}

impl SessionParams {
    pub fn new(tier: ProductTier, origin: &str) -> Self {
        Self {
            product_type: tier,
            name: tier.product_name(),
            description: tier.description(),
            unit_amount: tier.amount_cents(),
            currency: "usd",
            quantity: 1,
            success_url: success_url(origin),
            cancel_url: cancel_url(origin),
        }
    }
}

/// Redirect after payment. The placeholder is filled in by the provider.
pub fn success_url(origin: &str) -> String {
    format!(
        "{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}",
        origin.trim_end_matches('/')
    )
}

pub fn cancel_url(origin: &str) -> String {
    format!("{}/", origin.trim_end_matches('/'))
}

/// Transport to whatever creates checkout sessions
pub trait CheckoutGateway {
    fn create_session(&mut self, request: &CheckoutRequest)
    -> Result<CheckoutResponse, CheckoutError>;
}

/// Ask the gateway for a session URL.
///
/// On any failure the player gets one "Payment Error" notification and the
/// error is returned. Game state is never touched.
pub fn begin_checkout<G, N>(
    gateway: &mut G,
    tier: ProductTier,
    notifier: &mut N,
) -> Result<String, CheckoutError>
where
    G: CheckoutGateway + ?Sized,
    N: Notifier + ?Sized,
{
    let request = CheckoutRequest::new(tier);
    let result = gateway
        .create_session(&request)
        .and_then(CheckoutResponse::into_result);

    match result {
        Ok(url) => {
            log::info!("Checkout session created for {}", tier.as_str());
            Ok(url)
        }
        Err(err) => {
            log::error!("Payment error: {err}");
            notifier.notify(Notification::payment_error());
            Err(err)
        }
    }
}
