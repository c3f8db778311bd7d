pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod filter;
pub mod handlers;
pub mod importer;
pub mod middleware;
pub mod options;
pub mod services;
pub mod types;

#[cfg(test)]
pub mod testing;
