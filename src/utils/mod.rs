//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code and API key generation
//! - [`url_validator`] - Validation of submitted URLs
//! - [`qr_code`] - QR image rendering as `data:` URIs
//! - [`request_origin`] - Client IP and user agent extraction

pub mod code_generator;
pub mod qr_code;
pub mod request_origin;
pub mod url_validator;
