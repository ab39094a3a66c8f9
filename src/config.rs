//! Runtime configuration.

use anyhow::{Context, Result};

/// Settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the table holding ingested records.
    pub table_name: String,
}

impl Config {
    /// Reads configuration from the environment. `TABLE_NAME` is required.
    pub fn from_env() -> Result<Self> {
        let table_name = std::env::var("TABLE_NAME").context("TABLE_NAME must be set")?;
        Ok(Self { table_name })
    }
}
