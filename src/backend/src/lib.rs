pub mod api;
pub mod automation;
pub mod board;
pub mod config;
pub mod controller;
pub mod http_response;
pub mod logging;
pub mod switch;
