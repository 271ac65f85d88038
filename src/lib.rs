pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod model;
pub mod session;
pub mod state;
pub mod tui;
pub mod ui;
pub mod worker;
