use crate::{Alert, PageState};
use serde_json::Value;
use stock_model::{LocaleNumber, SignalRecord, StockRecord, format_price};

const NO_DATA: &str = "<p>No data available for the selected period or issuer.</p>";

pub fn render_stock_info(issuer: &str, records: &[StockRecord]) -> String {
    let mut html = format!(
        "<h3>Stock Information for {}</h3>\n<table border=\"1\">\n<thead>\n<tr><th>Date</th><th>Price</th><th>Volume</th></tr>\n</thead>\n<tbody>\n",
        escape_html(issuer)
    );

    for record in records {
        let price = format_price(record.last_trade_price.as_ref());
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&display_value(record.date.as_ref())),
            display_number(price),
            escape_html(&display_volume(record.volume.as_ref())),
        ));
    }

    html.push_str("</tbody>\n</table>");
    html
}

pub fn render_signals(issuer: &str, signals: &[SignalRecord]) -> String {
    let mut html = format!(
        "<h3>RSI Signals for {}</h3>\n<table border=\"1\">\n<thead>\n<tr><th>Date</th><th>Price</th><th>RSI</th><th>Signal</th></tr>\n</thead>\n<tbody>\n",
        escape_html(issuer)
    );

    for signal in signals {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&display_value(signal.date.as_ref())),
            display_number(format_price(signal.last_trade_price.as_ref())),
            display_rsi(signal.rsi.as_ref()),
            escape_html(&display_value(signal.signal.as_ref())),
        ));
    }

    html.push_str("</tbody>\n</table>");
    html
}

pub fn render_no_data() -> String {
    NO_DATA.to_string()
}

pub fn render_alert(alert: &Alert) -> String {
    format!("<p role=\"alert\">{}</p>", escape_html(&alert.to_string()))
}

pub fn render_page(state: &PageState) -> String {
    let mut options = String::from("<option value=\"\">Select an issuer</option>\n");
    for option in &state.issuer_options {
        let selected = state.selected_issuer.as_deref() == Some(option.value.as_str());
        options.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            escape_html(&option.value),
            if selected { " selected" } else { "" },
            escape_html(&option.label),
        ));
    }

    let stock_info = state.stock_info.as_deref().unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Stock Prices</title>
</head>
<body>
<h1>Stock Prices</h1>
<form action="/stock-info" method="get" target="stock-info">
<label for="issuer">Issuer</label>
<select id="issuer" name="issuer">
{options}</select>
<label for="from-date">From</label>
<input type="date" id="from-date" name="from" value="{from}">
<label for="to-date">To</label>
<input type="date" id="to-date" name="to" value="{to}">
<button type="submit">Get Stock Data</button>
<button type="submit" formaction="/signals" formtarget="signals-info">Get RSI Signals</button>
</form>
<iframe id="stock-info" name="stock-info" srcdoc="{stock_info}"></iframe>
<iframe id="signals-info" name="signals-info" srcdoc="{signal_info}"></iframe>
</body>
</html>
"#,
        options = options,
        from = escape_html(state.from_date.as_deref().unwrap_or_default()),
        to = escape_html(state.to_date.as_deref().unwrap_or_default()),
        stock_info = escape_html(stock_info),
        signal_info = escape_html(state.signal_info.as_deref().unwrap_or_default()),
    )
}

/// Formats a number the way a browser prints it: integers without a
/// fraction, `NaN`/`Infinity` spelled out, exponent form from 1e21 up.
pub fn display_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", value);
    }

    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

/// Prints a JSON value the way string interpolation in a browser does:
/// `undefined` when missing, arrays joined by commas, objects as
/// `[object Object]`.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => display_number(n.as_f64().unwrap_or(f64::NAN)),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// Falsy volumes (missing, zero, NaN, empty text, false) show as 0.
fn display_volume(volume: Option<&LocaleNumber>) -> String {
    match volume {
        Some(LocaleNumber::Number(n)) if *n != 0.0 && !n.is_nan() => display_number(*n),
        Some(LocaleNumber::Text(text)) if !text.is_empty() => text.clone(),
        Some(LocaleNumber::Other(value)) if !matches!(value, Value::Bool(false) | Value::Null) => {
            display_value(Some(value))
        }
        _ => "0".to_string(),
    }
}

fn display_rsi(rsi: Option<&LocaleNumber>) -> String {
    let value = format_price(rsi);
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        display_number(value)
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SelectOption;

    fn record(date: &str, price: Option<LocaleNumber>, volume: Option<LocaleNumber>) -> StockRecord {
        StockRecord {
            date: Some(serde_json::json!(date)),
            last_trade_price: price,
            volume,
        }
    }

    #[test]
    fn render_stock_info_pass_single_row() {
        let html = render_stock_info(
            "ALK",
            &[record(
                "2024-01-01",
                Some(LocaleNumber::Text("1.234,56".to_string())),
                Some(LocaleNumber::Number(100.0)),
            )],
        );
        assert!(html.starts_with("<h3>Stock Information for ALK</h3>"));
        assert!(html.contains("<tr><th>Date</th><th>Price</th><th>Volume</th></tr>"));
        assert!(html.contains("<tr><td>2024-01-01</td><td>1234.56</td><td>100</td></tr>"));
        assert!(html.ends_with("</tbody>\n</table>"));
    }

    #[test]
    fn render_stock_info_pass_rows_in_order() {
        let html = render_stock_info(
            "ALK",
            &[
                record("2024-01-02", Some(LocaleNumber::Number(10.0)), None),
                record("2024-01-01", Some(LocaleNumber::Number(9.5)), None),
            ],
        );
        let second = html.find("2024-01-02").unwrap();
        let first = html.find("2024-01-01").unwrap();
        assert!(second < first);
    }

    #[test]
    fn render_stock_info_pass_missing_price_and_volume() {
        let html = render_stock_info("ALK", &[record("2024-01-01", None, None)]);
        assert!(html.contains("<tr><td>2024-01-01</td><td>0</td><td>0</td></tr>"));
    }

    #[test]
    fn render_stock_info_pass_unparsable_price() {
        let html = render_stock_info(
            "ALK",
            &[record("2024-01-01", Some(LocaleNumber::Text("n/a".to_string())), None)],
        );
        assert!(html.contains("<td>NaN</td>"));
    }

    #[test]
    fn render_stock_info_pass_escapes_markup() {
        let html = render_stock_info("<b>", &[record("<script>", None, None)]);
        assert!(html.contains("Stock Information for &lt;b&gt;"));
        assert!(html.contains("<td>&lt;script&gt;</td>"));
    }

    #[test]
    fn render_no_data_pass_has_no_table() {
        let html = render_no_data();
        assert_eq!(
            html,
            "<p>No data available for the selected period or issuer.</p>"
        );
        assert!(!html.contains("<table"));
    }

    #[test]
    fn render_alert_pass() {
        assert_eq!(
            render_alert(&Alert::MissingDates),
            "<p role=\"alert\">Please select both &#39;From&#39; and &#39;To&#39; dates.</p>"
        );
    }

    #[test]
    fn render_page_pass_options_and_ids() {
        let state = PageState {
            issuer_options: vec![SelectOption {
                value: "ALK".to_string(),
                label: "Alkaloid".to_string(),
            }],
            selected_issuer: Some("ALK".to_string()),
            ..Default::default()
        };
        let html = render_page(&state);
        assert!(html.contains("<select id=\"issuer\" name=\"issuer\">"));
        assert!(html.contains("<option value=\"ALK\" selected>Alkaloid</option>"));
        assert!(html.contains("id=\"from-date\""));
        assert!(html.contains("id=\"to-date\""));
        assert!(html.contains("id=\"stock-info\""));
        assert!(html.contains("id=\"signals-info\""));
        assert!(html.contains("formaction=\"/signals\""));
    }

    #[test]
    fn display_number_pass() {
        assert_eq!(display_number(1234.56), "1234.56");
        assert_eq!(display_number(100.0), "100");
        assert_eq!(display_number(-0.0), "0");
        assert_eq!(display_number(f64::NAN), "NaN");
        assert_eq!(display_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(display_number(1e21), "1e+21");
        assert_eq!(display_number(1.5e-7), "1.5e-7");
    }

    #[test]
    fn display_volume_pass_falsy_is_zero() {
        assert_eq!(display_volume(None), "0");
        assert_eq!(display_volume(Some(&LocaleNumber::Number(0.0))), "0");
        assert_eq!(display_volume(Some(&LocaleNumber::Text(String::new()))), "0");
        assert_eq!(
            display_volume(Some(&LocaleNumber::Other(serde_json::Value::Bool(false)))),
            "0"
        );
    }

    #[test]
    fn display_volume_pass_array_and_object_like_browser() {
        assert_eq!(
            display_volume(Some(&LocaleNumber::Other(serde_json::json!([])))),
            ""
        );
        assert_eq!(
            display_volume(Some(&LocaleNumber::Other(serde_json::json!([1, null, "a"])))),
            "1,,a"
        );
        assert_eq!(
            display_volume(Some(&LocaleNumber::Other(serde_json::json!({"a": 1})))),
            "[object Object]"
        );
    }

    #[test]
    fn display_value_pass() {
        assert_eq!(display_value(None), "undefined");
        assert_eq!(display_value(Some(&Value::Null)), "null");
        assert_eq!(display_value(Some(&serde_json::json!(20240101))), "20240101");
        assert_eq!(display_value(Some(&serde_json::json!(1.5))), "1.5");
        assert_eq!(display_value(Some(&serde_json::json!("2024-01-01"))), "2024-01-01");
    }

    #[test]
    fn render_stock_info_pass_null_date() {
        let html = render_stock_info(
            "ALK",
            &[StockRecord {
                date: Some(Value::Null),
                last_trade_price: Some(LocaleNumber::Number(10.0)),
                volume: None,
            }],
        );
        assert!(html.contains("<tr><td>null</td><td>10</td><td>0</td></tr>"));
    }

    #[test]
    fn render_signals_pass() {
        let html = render_signals(
            "ALK",
            &[
                SignalRecord {
                    date: Some(serde_json::json!("2024-01-19")),
                    last_trade_price: Some(LocaleNumber::Number(21400.0)),
                    rsi: Some(LocaleNumber::Number(50.0)),
                    signal: Some(serde_json::json!("Hold")),
                },
                SignalRecord {
                    date: Some(serde_json::json!("2024-01-20")),
                    last_trade_price: Some(LocaleNumber::Text("21.500,00".to_string())),
                    rsi: Some(LocaleNumber::Number(72.4567)),
                    signal: Some(serde_json::json!("Sell")),
                },
            ],
        );
        assert!(html.starts_with("<h3>RSI Signals for ALK</h3>"));
        assert!(html.contains("<th>RSI</th><th>Signal</th>"));
        assert!(html.contains("<tr><td>2024-01-19</td><td>21400</td><td>50.00</td><td>Hold</td></tr>"));
        assert!(html.contains("<tr><td>2024-01-20</td><td>21500</td><td>72.46</td><td>Sell</td></tr>"));
        assert!(html.find("2024-01-19").unwrap() < html.find("2024-01-20").unwrap());
    }

    #[test]
    fn display_volume_pass_text_unchanged() {
        assert_eq!(
            display_volume(Some(&LocaleNumber::Text("1.250".to_string()))),
            "1.250"
        );
    }
}
