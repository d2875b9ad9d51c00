pub mod calendar;
pub mod config;
pub mod content;
pub mod db;
pub mod errors;
pub mod fixtures;
pub mod llm_client;
pub mod models;
pub mod reports;
pub mod routes;
pub mod state;
pub mod store;
