//! Endpoint descriptors for the trade API.
//!
//! Each public client method is one row here: HTTP method, path template,
//! whether it must be signed, and which envelope field holds the payload.

use reqwest::Method;
use serde_json::{Map, Value};
use tracing::warn;

use common::{Error, Result};

/// Where the payload lives in the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// The whole response object is the payload.
    Whole,
    /// `body[field]` is an ordered sequence.
    List(&'static str),
    /// `body[field]` is a mapping.
    Object(&'static str),
}

/// Unwrapped payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    List(Vec<Value>),
    Object(Map<String, Value>),
}

impl Payload {
    pub fn into_list(self) -> Result<Vec<Value>> {
        match self {
            Payload::List(items) => Ok(items),
            Payload::Object(_) => Err(Error::ResponseFormat(
                "expected a list payload, found an object".into(),
            )),
        }
    }

    pub fn into_object(self) -> Result<Map<String, Value>> {
        match self {
            Payload::Object(map) => Ok(map),
            Payload::List(_) => Err(Error::ResponseFormat(
                "expected an object payload, found a list".into(),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: Method,
    /// Path relative to the base URL; `{name}` segments are placeholders.
    pub path: &'static str,
    pub authenticated: bool,
    pub envelope: Envelope,
}

impl Endpoint {
    /// Substitute placeholders left to right with `args`.
    pub fn resolve_path(&self, args: &[&str]) -> String {
        let mut resolved = String::with_capacity(self.path.len() + 32);
        let mut args = args.iter();
        let mut rest = self.path;

        while let Some(open) = rest.find('{') {
            resolved.push_str(&rest[..open]);
            let Some(close) = rest[open..].find('}') else {
                resolved.push_str(&rest[open..]);
                rest = "";
                break;
            };
            match args.next() {
                Some(arg) => resolved.push_str(arg),
                None => resolved.push_str(&rest[open..open + close + 1]),
            }
            rest = &rest[open + close + 1..];
        }
        resolved.push_str(rest);
        debug_assert!(args.next().is_none(), "too many path args for {}", self.name);
        resolved
    }

    /// Pull the declared payload out of a response body.
    ///
    /// A missing or `null` field yields an empty container (logged at warn).
    /// A field of the wrong shape, or a non-object body, is a format error.
    pub fn extract(&self, body: Value) -> Result<Payload> {
        let Value::Object(mut envelope) = body else {
            return Err(Error::ResponseFormat(format!(
                "{}: expected a JSON object response, got {}",
                self.name,
                type_name(&body)
            )));
        };

        match self.envelope {
            Envelope::Whole => Ok(Payload::Object(envelope)),
            Envelope::List(field) => match envelope.remove(field) {
                Some(Value::Array(items)) => Ok(Payload::List(items)),
                None | Some(Value::Null) => {
                    warn!("{}: response missing '{}', treating as empty", self.name, field);
                    Ok(Payload::List(Vec::new()))
                }
                Some(other) => Err(self.shape_error(field, "array", &other)),
            },
            Envelope::Object(field) => match envelope.remove(field) {
                Some(Value::Object(map)) => Ok(Payload::Object(map)),
                None | Some(Value::Null) => {
                    warn!("{}: response missing '{}', treating as empty", self.name, field);
                    Ok(Payload::Object(Map::new()))
                }
                Some(other) => Err(self.shape_error(field, "object", &other)),
            },
        }
    }

    fn shape_error(&self, field: &str, expected: &str, found: &Value) -> Error {
        Error::ResponseFormat(format!(
            "{}: field '{}' should be an {}, got {}",
            self.name,
            field,
            expected,
            type_name(found)
        ))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Public market data ────────────────────────────────────────────────

pub static LIST_MARKETS: Endpoint = Endpoint {
    name: "list_markets",
    method: Method::GET,
    path: "/markets",
    authenticated: false,
    envelope: Envelope::List("markets"),
};

pub static GET_MARKET: Endpoint = Endpoint {
    name: "get_market",
    method: Method::GET,
    path: "/markets/{ticker}",
    authenticated: false,
    envelope: Envelope::Object("market"),
};

pub static GET_ORDERBOOK: Endpoint = Endpoint {
    name: "get_orderbook",
    method: Method::GET,
    path: "/markets/{ticker}/orderbook",
    authenticated: false,
    envelope: Envelope::Object("orderbook"),
};

pub static LIST_TRADES: Endpoint = Endpoint {
    name: "list_trades",
    method: Method::GET,
    path: "/markets/{ticker}/trades",
    authenticated: false,
    envelope: Envelope::List("trades"),
};

pub static LIST_EVENTS: Endpoint = Endpoint {
    name: "list_events",
    method: Method::GET,
    path: "/events",
    authenticated: false,
    envelope: Envelope::List("events"),
};

pub static GET_EVENT: Endpoint = Endpoint {
    name: "get_event",
    method: Method::GET,
    path: "/events/{event_ticker}",
    authenticated: false,
    envelope: Envelope::Object("event"),
};

// ── Portfolio (signed) ────────────────────────────────────────────────

pub static GET_BALANCE: Endpoint = Endpoint {
    name: "get_balance",
    method: Method::GET,
    path: "/portfolio/balance",
    authenticated: true,
    envelope: Envelope::Whole,
};

pub static LIST_POSITIONS: Endpoint = Endpoint {
    name: "list_positions",
    method: Method::GET,
    path: "/portfolio/positions",
    authenticated: true,
    envelope: Envelope::List("market_positions"),
};

pub static LIST_ORDERS: Endpoint = Endpoint {
    name: "list_orders",
    method: Method::GET,
    path: "/portfolio/orders",
    authenticated: true,
    envelope: Envelope::List("orders"),
};

pub static CREATE_ORDER: Endpoint = Endpoint {
    name: "create_order",
    method: Method::POST,
    path: "/portfolio/orders",
    authenticated: true,
    envelope: Envelope::Object("order"),
};

pub static CANCEL_ORDER: Endpoint = Endpoint {
    name: "cancel_order",
    method: Method::DELETE,
    path: "/portfolio/orders/{order_id}",
    authenticated: true,
    envelope: Envelope::Object("order"),
};
