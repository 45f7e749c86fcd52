pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod presentation;
pub mod recorder;
pub mod routes;
pub mod services;
pub mod store;
pub mod version;
