//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

use crate::domain::Error;

pub mod auth;
pub mod error;
pub mod food_requests;
pub mod health;
pub mod listings;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// JSON extractor configuration shared by every route.
///
/// Malformed or non-object bodies are reported as `invalid_request` instead
/// of actix's plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid JSON body: {err}")).into()
    })
}

/// Register every RFood route on `cfg`.
///
/// Expects [`state::HttpState`] and [`health::HealthState`] as app data and a
/// session middleware wrapping the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health::banner)
        .service(health::ready)
        .service(health::live)
        .service(auth::issue_session)
        .service(auth::logout)
        .service(listings::add_food)
        .service(listings::search_foods)
        .service(listings::all_foods)
        .service(listings::get_food)
        .service(listings::donor_foods)
        .service(listings::update_food)
        .service(listings::delete_food)
        .service(food_requests::request_add)
        .service(food_requests::requested_food);
}
