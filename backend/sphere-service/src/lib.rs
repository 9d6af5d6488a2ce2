pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod repository;
pub mod services;
pub mod state;
