pub mod app;
pub mod client;
pub mod config;
pub mod logging;
pub mod model;
pub mod report;
pub mod ui;
