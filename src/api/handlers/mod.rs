//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod api_keys;
pub mod auth;
pub mod health;
pub mod history;
pub mod metrics;
pub mod redirect;
pub mod shorten;
pub mod stats;

pub use api_keys::{create_api_key_handler, list_api_keys_handler, revoke_api_key_handler};
pub use auth::{
    change_password_handler, login_handler, profile_handler, register_handler,
    update_profile_handler,
};
pub use health::health_handler;
pub use history::history_handler;
pub use metrics::metrics_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use stats::stats_handler;
