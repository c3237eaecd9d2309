//! Chinook API: registry-driven CRUD REST backend over the Chinook schema, with SQLite full-text search.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod search;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{resolve, ResolvedModel, Settings};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use response::{success_many, success_one, success_one_ok};
pub use routes::{app, service_routes, entity_routes};
pub use search::TextSearchManager;
pub use service::CrudService;
pub use state::AppState;
pub use store::{connect, init_db};
