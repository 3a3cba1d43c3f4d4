use log::{error, info};
use serde::{Deserialize, Serialize};
use std::process::exit;
use stock_api::api::StockAPI;
use stock_page::{Alert, PageState, fetch_rsi_signals, fetch_stock_data, load_issuers, render};

use actix_web::{
    App, HttpResponse, HttpServer, Responder, get, http::header::ContentType, middleware::Logger,
    web,
};

mod config;

#[derive(Serialize)]
struct HealthcheckResponse {
    status: String,
}

#[derive(Deserialize)]
struct PageQuery {
    issuer: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

impl PageQuery {
    fn into_state(self) -> PageState {
        PageState {
            selected_issuer: self.issuer,
            from_date: self.from,
            to_date: self.to,
            ..Default::default()
        }
    }
}

#[get("/")]
async fn index(api: web::Data<StockAPI>) -> impl Responder {
    let mut state = PageState::default();
    load_issuers(&mut state, api.get_ref()).await;
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render::render_page(&state))
}

/// An alert is a 400, rendered content a 200, and nothing rendered (the
/// fetch failed) a 204 so the browser keeps the old frame content.
fn fragment_response(result: Result<(), Alert>, content: Option<String>) -> HttpResponse {
    if let Err(alert) = result {
        return HttpResponse::BadRequest()
            .content_type(ContentType::html())
            .body(render::render_alert(&alert));
    }

    match content {
        Some(html) => HttpResponse::Ok().content_type(ContentType::html()).body(html),
        None => HttpResponse::NoContent().finish(),
    }
}

#[get("/stock-info")]
async fn stock_info(query: web::Query<PageQuery>, api: web::Data<StockAPI>) -> impl Responder {
    let mut state = query.into_inner().into_state();
    let result = fetch_stock_data(&mut state, api.get_ref()).await;
    fragment_response(result, state.stock_info)
}

#[get("/signals")]
async fn signals(query: web::Query<PageQuery>, api: web::Data<StockAPI>) -> impl Responder {
    let mut state = query.into_inner().into_state();
    let result = fetch_rsi_signals(&mut state, api.get_ref()).await;
    fragment_response(result, state.signal_info)
}

#[get("/healthcheck")]
async fn healthcheck() -> impl Responder {
    web::Json(HealthcheckResponse {
        status: "ok".to_string(),
    })
}

async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(HealthcheckResponse {
        status: "not found".to_string(),
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Could not create config: {}", e);
            exit(1);
        }
    };

    let stock_api = web::Data::new(StockAPI::new(&config.backend_url));
    info!("Using backend {}", stock_api.base_url());

    HttpServer::new(move || {
        App::new()
            .app_data(stock_api.clone())
            .service(index)
            .service(stock_info)
            .service(signals)
            .service(healthcheck)
            .default_service(web::to(not_found))
            .wrap(Logger::default())
    })
    .bind(("0.0.0.0", 8080))?
    .workers(config.workers)
    .run()
    .await
}
