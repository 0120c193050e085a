//! REST client for the Kalshi API.
//!
//! Covers: market discovery, events, portfolio queries, order management.
//! Portfolio routes are signed via [`KalshiAuth`]; market data is public.

use reqwest::Method;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use common::{ClientConfig, Error, OrderRequest, Result};

use crate::auth::{KalshiAuth, CONTENT_TYPE_JSON, HEADER_CONTENT_TYPE};
use crate::endpoints::{
    Endpoint, Payload, CANCEL_ORDER, CREATE_ORDER, GET_BALANCE, GET_EVENT, GET_MARKET,
    GET_ORDERBOOK, LIST_EVENTS, LIST_MARKETS, LIST_ORDERS, LIST_POSITIONS, LIST_TRADES,
};
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};

const DEFAULT_SETTLEMENT_STATUS: &str = "unsettled";
const DEFAULT_ORDER_STATUS: &str = "resting";

/// Query parameters in insertion order. `None` values are never added.
#[derive(Debug, Default)]
struct Query(Vec<(String, String)>);

impl Query {
    fn new() -> Self {
        Self::default()
    }

    fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    fn opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

fn summarize_response_body(raw: &str) -> String {
    const MAX_CHARS: usize = 800;
    let compact = raw.replace(['\n', '\r'], " ");
    match compact.char_indices().nth(MAX_CHARS) {
        Some((cut, _)) => format!("{}…", &compact[..cut]),
        None => compact,
    }
}

fn require(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidRequest(format!("{name} must not be empty")));
    }
    Ok(())
}

/// Async REST client for the Kalshi trade API.
///
/// Holds only immutable configuration; every call builds its own headers and
/// parameters, so one instance can be shared across tasks.
#[derive(Debug, Clone)]
pub struct KalshiRestClient<T = ReqwestTransport> {
    transport: T,
    auth: KalshiAuth,
    base_url: String,
}

impl KalshiRestClient<ReqwestTransport> {
    /// Create a client using the default `reqwest` transport.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_transport(config, ReqwestTransport::new()?)
    }
}

impl<T: HttpTransport> KalshiRestClient<T> {
    /// Create a client over a caller-supplied transport.
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self> {
        let auth = KalshiAuth::new(config.api_key.clone(), config.private_key_pem.as_deref())?;
        debug!(
            "Kalshi client: base_url={} authenticated={}",
            config.base_url,
            auth.has_credentials()
        );
        Ok(Self {
            transport,
            auth,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether signed endpoints are usable.
    pub fn is_authenticated(&self) -> bool {
        self.auth.has_credentials()
    }

    /// URL helper.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Dispatch one request and return the parsed JSON body.
    ///
    /// `path` is relative to the base URL and carries no query string; it is
    /// also the path that gets signed. Non-2xx statuses become
    /// [`Error::Api`]; nothing is retried.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
        authenticated: bool,
    ) -> Result<Value> {
        let headers: Vec<(String, String)> = if authenticated {
            self.auth
                .sign(method.as_str(), path)?
                .pairs()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect()
        } else {
            vec![(HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string())]
        };

        debug!(
            "{} {} (auth={}, params={})",
            method,
            path,
            authenticated,
            query.len()
        );

        let resp = self
            .transport
            .execute(HttpRequest {
                method,
                url: self.url(path),
                headers,
                query,
                body,
            })
            .await?;

        if !resp.is_success() {
            warn!(
                "Kalshi API returned {} for {}: {}",
                resp.status,
                path,
                summarize_response_body(&resp.body)
            );
            return Err(Error::Api {
                status: resp.status,
                body: resp.body,
            });
        }

        serde_json::from_str(&resp.body).map_err(|e| {
            Error::ResponseFormat(format!(
                "Error decoding response for {}: {}; body={}",
                path,
                e,
                summarize_response_body(&resp.body)
            ))
        })
    }

    /// Dispatch through an endpoint descriptor and extract its payload.
    async fn call(
        &self,
        endpoint: &Endpoint,
        path_args: &[&str],
        query: Query,
        body: Option<Value>,
    ) -> Result<Payload> {
        let path = endpoint.resolve_path(path_args);
        let raw = self
            .request(
                endpoint.method.clone(),
                &path,
                query.into_pairs(),
                body,
                endpoint.authenticated,
            )
            .await?;
        endpoint.extract(raw)
    }

    // ── Read endpoints ────────────────────────────────────────────────

    /// List markets. Unset filters are omitted from the query.
    pub async fn get_markets(
        &self,
        limit: Option<u32>,
        status: Option<&str>,
        cursor: Option<&str>,
        event_ticker: Option<&str>,
    ) -> Result<Vec<Value>> {
        let query = Query::new()
            .opt("limit", limit)
            .opt("status", status)
            .opt("cursor", cursor)
            .opt("event_ticker", event_ticker);

        let markets = self.call(&LIST_MARKETS, &[], query, None).await?.into_list()?;
        debug!("Fetched {} markets", markets.len());
        Ok(markets)
    }

    /// Fetch a single market by ticker.
    pub async fn get_market(&self, ticker: &str) -> Result<Map<String, Value>> {
        require("ticker", ticker)?;
        self.call(&GET_MARKET, &[ticker], Query::new(), None)
            .await?
            .into_object()
    }

    pub async fn get_orderbook(
        &self,
        ticker: &str,
        depth: Option<u32>,
    ) -> Result<Map<String, Value>> {
        require("ticker", ticker)?;
        // A depth of 0 means the full book, same as leaving it out.
        let query = Query::new().opt("depth", depth.filter(|d| *d > 0));
        self.call(&GET_ORDERBOOK, &[ticker], query, None)
            .await?
            .into_object()
    }

    /// Recent trades for a market.
    pub async fn get_trades(
        &self,
        ticker: &str,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<Vec<Value>> {
        require("ticker", ticker)?;
        let query = Query::new().opt("limit", limit).opt("cursor", cursor);
        let trades = self
            .call(&LIST_TRADES, &[ticker], query, None)
            .await?
            .into_list()?;
        debug!("Fetched {} trades for {}", trades.len(), ticker);
        Ok(trades)
    }

    pub async fn get_events(
        &self,
        limit: Option<u32>,
        status: Option<&str>,
        cursor: Option<&str>,
    ) -> Result<Vec<Value>> {
        let query = Query::new()
            .opt("limit", limit)
            .opt("status", status)
            .opt("cursor", cursor);
        let events = self.call(&LIST_EVENTS, &[], query, None).await?.into_list()?;
        debug!("Fetched {} events", events.len());
        Ok(events)
    }

    pub async fn get_event(&self, event_ticker: &str) -> Result<Map<String, Value>> {
        require("event_ticker", event_ticker)?;
        self.call(&GET_EVENT, &[event_ticker], Query::new(), None)
            .await?
            .into_object()
    }

    // ── Portfolio endpoints ───────────────────────────────────────────

    /// Account balance. Returns the whole response object (values in cents).
    pub async fn get_balance(&self) -> Result<Map<String, Value>> {
        self.call(&GET_BALANCE, &[], Query::new(), None)
            .await?
            .into_object()
    }

    /// Market positions. `settlement_status` defaults to `"unsettled"`.
    pub async fn get_positions(
        &self,
        ticker: Option<&str>,
        settlement_status: Option<&str>,
    ) -> Result<Vec<Value>> {
        let query = Query::new()
            .param(
                "settlement_status",
                settlement_status.unwrap_or(DEFAULT_SETTLEMENT_STATUS),
            )
            .opt("ticker", ticker);
        let positions = self
            .call(&LIST_POSITIONS, &[], query, None)
            .await?
            .into_list()?;
        debug!("Fetched {} positions", positions.len());
        Ok(positions)
    }

    /// Orders. `status` defaults to `"resting"`.
    pub async fn get_orders(
        &self,
        ticker: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<Value>> {
        let query = Query::new()
            .param("status", status.unwrap_or(DEFAULT_ORDER_STATUS))
            .opt("ticker", ticker);
        let orders = self.call(&LIST_ORDERS, &[], query, None).await?.into_list()?;
        debug!("Fetched {} orders", orders.len());
        Ok(orders)
    }

    // ── Write endpoints ───────────────────────────────────────────────

    /// Place an order.
    pub async fn create_order(&self, order: &OrderRequest) -> Result<Map<String, Value>> {
        order.validate()?;
        let body = order.body()?;

        debug!(
            "Creating order: {} {} {} {} @ {}¢ x{}",
            order.order_type.as_str().to_uppercase(),
            order.action.as_str().to_uppercase(),
            order.side.as_str().to_uppercase(),
            order.ticker,
            order.price,
            order.count,
        );

        let placed = self
            .call(&CREATE_ORDER, &[], Query::new(), Some(body))
            .await?
            .into_object()?;

        let order_id = placed.get("order_id").and_then(Value::as_str).unwrap_or("?");
        let status = placed.get("status").and_then(Value::as_str).unwrap_or("?");
        debug!("Order placed: id={} status={}", order_id, status);

        Ok(placed)
    }

    /// Cancel an order by its order ID.
    pub async fn cancel_order(&self, order_id: &str) -> Result<Map<String, Value>> {
        require("order_id", order_id)?;
        let order = self
            .call(&CANCEL_ORDER, &[order_id], Query::new(), None)
            .await?
            .into_object()?;
        debug!("Cancelled order: {}", order_id);
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_skips_none() {
        let pairs = Query::new()
            .opt("limit", Some(10))
            .opt::<&str>("cursor", None)
            .param("status", "open")
            .into_pairs();
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("status".to_string(), "open".to_string()),
            ]
        );
    }

    #[test]
    fn test_summarize_truncates_and_flattens() {
        let long = "x".repeat(1000);
        let summary = summarize_response_body(&long);
        assert_eq!(summary.chars().count(), 801);
        assert!(summary.ends_with('…'));

        assert_eq!(summarize_response_body("a\nb\rc"), "a b c");
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("ticker", "ABC").is_ok());
        assert!(matches!(require("ticker", " "), Err(Error::InvalidRequest(_))));
    }
}
