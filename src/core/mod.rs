pub mod config;
pub mod discovery;
pub mod error;
pub mod formatter;
pub mod models;
pub mod pricing;
pub mod projector;
pub mod providers;
pub mod window;
