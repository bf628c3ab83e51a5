//! PURRINT: turn any image into a dithered receipt and print it on a cat
//! printer.

pub mod config;
pub mod error;
pub mod services;

pub use config::AppConfig;
pub use error::ServiceError;
