pub mod aggregate;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod session;
pub mod settings;
pub mod state;
pub mod store;

#[cfg(test)]
pub mod testing;
