//! Human-readable rendering of client results.

use serde_json::{Map, Value};

fn field(obj: &Value, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "N/A".to_string(),
        Some(other) => other.to_string(),
    }
}

/// `TICKER: title` followed by the yes bid/ask line, one blank line between markets.
pub fn markets(markets: &[Value]) -> String {
    let mut out = String::new();
    for market in markets {
        out.push_str(&format!("{}: {}\n", field(market, "ticker"), field(market, "title")));
        out.push_str(&format!(
            "  Yes: {}¢ - {}¢\n\n",
            field(market, "yes_bid"),
            field(market, "yes_ask")
        ));
    }
    out
}

/// Balance is reported by the API in cents.
pub fn balance(balance: &Map<String, Value>) -> String {
    let cents = balance.get("balance").and_then(Value::as_f64).unwrap_or(0.0);
    format!("Balance: ${:.2}", cents / 100.0)
}

pub fn positions(positions: &[Value]) -> String {
    positions
        .iter()
        .map(|p| format!("{}: {} contracts\n", field(p, "ticker"), field(p, "position")))
        .collect()
}

pub fn json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unrenderable: {e}>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_markets_lines() {
        let rendered = markets(&[
            json!({"ticker": "PRES-24", "title": "Who wins?", "yes_bid": 40, "yes_ask": 42}),
            json!({"ticker": "RAIN", "title": "Rain?"}),
        ]);
        assert_eq!(
            rendered,
            "PRES-24: Who wins?\n  Yes: 40¢ - 42¢\n\nRAIN: Rain?\n  Yes: N/A¢ - N/A¢\n\n"
        );
    }

    #[test]
    fn test_balance_in_dollars() {
        let map = json!({"balance": 12345}).as_object().cloned().unwrap();
        assert_eq!(balance(&map), "Balance: $123.45");
        assert_eq!(balance(&Map::new()), "Balance: $0.00");
    }

    #[test]
    fn test_positions_lines() {
        let rendered = positions(&[json!({"ticker": "A", "position": -3})]);
        assert_eq!(rendered, "A: -3 contracts\n");
    }

    #[test]
    fn test_json_is_pretty() {
        assert_eq!(json(&json!({"a": 1})), "{\n  \"a\": 1\n}");
    }
}
