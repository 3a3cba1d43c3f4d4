use dotenvy::dotenv;
use std::env;
use stock_api::api::DEFAULT_BACKEND_URL;

pub struct Config {
    pub workers: usize,
    pub backend_url: String,
}

impl Config {
    pub fn new() -> Result<Config, Box<dyn std::error::Error>> {
        dotenv().ok();

        let workers = env::var("STOCK_PAGE_WORKERS")?;
        let backend_url = env::var("STOCK_PAGE_BACKEND")?;

        Config::from_values(&workers, &backend_url)
    }

    fn from_values(workers: &str, backend_url: &str) -> Result<Config, Box<dyn std::error::Error>> {
        let mut workers: usize = workers.trim().parse()?;
        let mut backend_url = backend_url.trim().to_string();

        if workers == 0 {
            workers = 1;
        }

        if backend_url.is_empty() {
            backend_url = DEFAULT_BACKEND_URL.to_string();
        }

        Ok(Config {
            workers,
            backend_url,
        })
    }
}
