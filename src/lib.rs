pub mod config;
pub mod event;
pub mod handler;
pub mod ingest;
pub mod object;
pub mod query;
pub mod store;
