pub mod app;
pub mod config;
pub mod constants;
#[cfg(feature = "db")]
pub mod db;
pub mod domain;
pub mod error;
pub mod graphql;
pub mod logging;
pub mod server;
pub mod storage;
pub mod time_format;
pub mod urls;
