use serde::{Deserialize, Deserializer};

mod price;

pub use price::{format_price, parse_float};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Issuer {
    pub code: String,
    pub name: String,
}

/// A JSON scalar that the backend may send either as a number or as
/// locale-formatted text ("1.234,56").
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LocaleNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// One row of price history. `date` keeps whatever JSON the backend sent:
/// `None` when the field is missing, `Some(Value::Null)` when it is `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    #[serde(default, deserialize_with = "present")]
    pub date: Option<serde_json::Value>,
    #[serde(default, alias = "last_trade_price")]
    pub last_trade_price: Option<LocaleNumber>,
    #[serde(default)]
    pub volume: Option<LocaleNumber>,
}

/// One row of the RSI signals endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignalRecord {
    #[serde(default, deserialize_with = "present")]
    pub date: Option<serde_json::Value>,
    #[serde(default, alias = "lastTradePrice")]
    pub last_trade_price: Option<LocaleNumber>,
    #[serde(default, rename = "RSI")]
    pub rsi: Option<LocaleNumber>,
    #[serde(default, deserialize_with = "present")]
    pub signal: Option<serde_json::Value>,
}

// keeps an explicit `null` apart from a missing field
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}
