//! Order value types shared by the client and the CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

// ── Enums ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    Limit,
    Market,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Yes => "yes",
            Side::No => "no",
        }
    }
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "buy",
            Action::Sell => "sell",
        }
    }
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
        }
    }
}

macro_rules! display_and_parse {
    ($ty:ident { $($text:literal => $variant:ident),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    other => Err(Error::InvalidRequest(format!(
                        "unknown {} '{}'",
                        stringify!($ty),
                        other
                    ))),
                }
            }
        }
    };
}

display_and_parse!(Side { "yes" => Yes, "no" => No });
display_and_parse!(Action { "buy" => Buy, "sell" => Sell });
display_and_parse!(OrderType { "limit" => Limit, "market" => Market });

// ── Orders ────────────────────────────────────────────────────────────

/// An order to be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Market ticker.
    pub ticker: String,
    pub side: Side,
    pub action: Action,
    /// Number of contracts.
    pub count: u32,
    /// Limit price in cents (1-99). Ignored for market orders.
    pub price: u32,
    pub order_type: OrderType,
    pub client_order_id: Option<String>,
}

/// Order request body for the Kalshi API.
#[derive(Debug, Clone, Serialize)]
struct CreateOrderBody<'a> {
    ticker: &'a str,
    side: Side,
    action: Action,
    #[serde(rename = "type")]
    order_type: OrderType,
    count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    yes_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_order_id: Option<&'a str>,
}

impl OrderRequest {
    /// Limit order with no client order id.
    pub fn limit(ticker: impl Into<String>, side: Side, action: Action, count: u32, price: u32) -> Self {
        Self {
            ticker: ticker.into(),
            side,
            action,
            count,
            price,
            order_type: OrderType::Limit,
            client_order_id: None,
        }
    }

    /// Check caller-side constraints before anything is sent.
    pub fn validate(&self) -> Result<(), Error> {
        if self.ticker.trim().is_empty() {
            return Err(Error::InvalidRequest("ticker must not be empty".into()));
        }
        if self.count == 0 {
            return Err(Error::InvalidRequest("count must be > 0".into()));
        }
        if self.order_type == OrderType::Limit && !(1..=99).contains(&self.price) {
            return Err(Error::InvalidRequest(format!(
                "limit price must be between 1 and 99 cents, got {}",
                self.price
            )));
        }
        Ok(())
    }

    /// JSON payload for `POST /portfolio/orders`.
    ///
    /// Limit orders carry the price under `yes_price` or `no_price` depending
    /// on the side; market orders carry no price at all.
    pub fn body(&self) -> Result<serde_json::Value, Error> {
        let (yes_price, no_price) = match (self.order_type, self.side) {
            (OrderType::Limit, Side::Yes) => (Some(self.price), None),
            (OrderType::Limit, Side::No) => (None, Some(self.price)),
            (OrderType::Market, _) => (None, None),
        };

        let body = CreateOrderBody {
            ticker: &self.ticker,
            side: self.side,
            action: self.action,
            order_type: self.order_type,
            count: self.count,
            yes_price,
            no_price,
            client_order_id: self.client_order_id.as_deref(),
        };

        serde_json::to_value(&body)
            .map_err(|e| Error::InvalidRequest(format!("Failed to encode order body: {e}")))
    }
}
