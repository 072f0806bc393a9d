//! HTTP inbound adapter exposing REST endpoints.
//!
//! All workflow routes live under `/api`; the health probes sit at the root.
//! Body, query and path extraction failures share the `invalid_request`
//! error envelope.

use actix_web::{Scope, web};

pub mod auth;
pub mod dashboard;
pub mod dishes;
pub mod donations;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;

/// Scope serving every `/api` route.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use foodshare::inbound::http::api_scope;
///
/// let app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(users::register)
        .service(users::login)
        .service(users::current_user)
        .service(donations::list_donations)
        .service(donations::create_donation)
        .service(donations::my_donations)
        .service(donations::accepted_donations)
        .service(donations::accept_donation)
        .service(dishes::list_dishes)
        .service(dishes::create_dish)
        .service(dishes::my_dishes)
        .service(dishes::distributed_dishes)
        .service(dishes::accept_dish)
        .service(dashboard::stats)
        .service(dashboard::history)
}
