pub mod auth;
pub mod catalog;
pub mod config;
pub mod http;
pub mod logging;
pub mod payload;
pub mod retry;
pub mod workbook;
