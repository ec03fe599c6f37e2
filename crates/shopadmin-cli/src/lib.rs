pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod observability;
pub mod output;
pub mod store;
