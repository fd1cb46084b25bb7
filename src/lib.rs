pub mod config;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod overlay;
pub mod parser;
pub mod projection;
pub mod services;
pub mod session;
pub mod stats;
pub mod traffic;
