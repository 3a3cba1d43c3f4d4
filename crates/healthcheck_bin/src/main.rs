use serde::Deserialize;
use std::env;

const DEFAULT_HEALTHCHECK_URL: &str = "http://localhost:8080/healthcheck";

#[derive(Debug)]
enum HealthcheckError {
    Request(String),
    BadStatus(u16),
    Unhealthy(String),
}

#[derive(Debug, Deserialize)]
struct StatusJSON {
    status: String,
}

impl std::fmt::Display for HealthcheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthcheckError::Request(e) => write!(f, "Request error: {}", e),
            HealthcheckError::BadStatus(code) => write!(f, "Unexpected status code {}", code),
            HealthcheckError::Unhealthy(status) => write!(f, "Service reports status {:?}", status),
        }
    }
}

impl From<reqwest::Error> for HealthcheckError {
    fn from(err: reqwest::Error) -> HealthcheckError {
        HealthcheckError::Request(err.to_string())
    }
}

fn healthcheck_url() -> String {
    dotenvy::dotenv().ok();
    env::var("STOCK_PAGE_HEALTHCHECK_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_HEALTHCHECK_URL.to_string())
}

fn check_status(body: &StatusJSON) -> Result<(), HealthcheckError> {
    if body.status != "ok" {
        return Err(HealthcheckError::Unhealthy(body.status.clone()));
    }
    Ok(())
}

fn main() -> Result<(), HealthcheckError> {
    let res = reqwest::blocking::get(healthcheck_url())?;
    if res.status() != 200 {
        return Err(HealthcheckError::BadStatus(res.status().as_u16()));
    }
    let body = res.json::<StatusJSON>()?;
    check_status(&body)
}
