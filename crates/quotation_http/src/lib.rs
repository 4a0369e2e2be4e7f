//! HTTP surface for the quotation service.
//! Routes map one-to-one onto `QuotationService` use-cases.

pub mod api;
pub mod config;
pub mod escape;
pub mod page;

use axum::routing::{get, post};
use axum::Router;
use quotation_core::{ConfiguredRepository, QuotationService};
use std::sync::Arc;

pub use config::ServerConfig;

pub type SharedService = Arc<QuotationService<ConfiguredRepository>>;

/// Builds the application router over `service`.
pub fn build_router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/save", post(api::save))
        .route("/load/:id", get(api::load))
        .route("/delete/:id", get(api::delete))
        .route("/export/txt/:id", get(api::export_text))
        .route("/export/excel/:id", get(api::export_spreadsheet))
        .route("/healthz", get(api::healthz))
        .with_state(service)
}
