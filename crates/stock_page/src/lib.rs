use log::{debug, error};
use std::fmt;
use stock_api::api::StockSource;

pub mod render;

/// One entry of the issuer selector.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Everything the page shows or reads: the issuer selector, the two date
/// inputs, the `stock-info` container and the `signals-info` container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub issuer_options: Vec<SelectOption>,
    pub selected_issuer: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub stock_info: Option<String>,
    pub signal_info: Option<String>,
}

/// Missing user input, reported before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    MissingIssuer,
    MissingDates,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Alert::MissingIssuer => write!(f, "Please select an issuer."),
            Alert::MissingDates => write!(f, "Please select both 'From' and 'To' dates."),
        }
    }
}

/// Fills the issuer selector in response order. Failures are only logged and
/// leave the selector as it was.
pub async fn load_issuers<S: StockSource>(state: &mut PageState, source: &S) {
    match source.issuers().await {
        Ok(issuers) => {
            state
                .issuer_options
                .extend(issuers.into_iter().map(|issuer| SelectOption {
                    value: issuer.code,
                    label: issuer.name,
                }));
        }
        Err(e) => error!("Error fetching issuers: {}", e),
    }
}

/// Fetches the price history for the selected issuer and date range and
/// renders it into `stock_info`.
///
/// Missing input is returned as an [`Alert`] without touching the network.
/// A failed request is logged and `stock_info` keeps its previous content.
pub async fn fetch_stock_data<S: StockSource>(
    state: &mut PageState,
    source: &S,
) -> Result<(), Alert> {
    let (issuer, from, to) =
        required_inputs(&state.selected_issuer, &state.from_date, &state.to_date)?;

    match source.stock_data(issuer, from, to).await {
        Ok(Some(records)) if !records.is_empty() => {
            for record in &records {
                debug!("fetch_stock_data | record: {:?}", record);
            }
            state.stock_info = Some(render::render_stock_info(issuer, &records));
        }
        Ok(_) => state.stock_info = Some(render::render_no_data()),
        Err(e) => error!("Error fetching stock data: {}", e),
    }

    Ok(())
}

/// Fetches RSI values and Buy/Sell/Hold signals for the same inputs as
/// [`fetch_stock_data`] and renders them into `signal_info`, with the same
/// alert and failure rules.
pub async fn fetch_rsi_signals<S: StockSource>(
    state: &mut PageState,
    source: &S,
) -> Result<(), Alert> {
    let (issuer, from, to) =
        required_inputs(&state.selected_issuer, &state.from_date, &state.to_date)?;

    match source.rsi_signals(issuer, from, to).await {
        Ok(Some(signals)) if !signals.is_empty() => {
            debug!("fetch_rsi_signals | {} signals", signals.len());
            state.signal_info = Some(render::render_signals(issuer, &signals));
        }
        Ok(_) => state.signal_info = Some(render::render_no_data()),
        Err(e) => error!("Error fetching RSI signals: {}", e),
    }

    Ok(())
}

fn required_inputs<'a>(
    issuer: &'a Option<String>,
    from: &'a Option<String>,
    to: &'a Option<String>,
) -> Result<(&'a str, &'a str, &'a str), Alert> {
    let issuer = non_empty(issuer).ok_or(Alert::MissingIssuer)?;
    match (non_empty(from), non_empty(to)) {
        (Some(from), Some(to)) => Ok((issuer, from, to)),
        _ => Err(Alert::MissingDates),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
