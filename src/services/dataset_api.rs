//! Trait and types for reading a bike-share dataset.

use anyhow::Result;

use crate::traffic::types::{Station, TripRecord};

/// Trip rows read from a dataset, before timestamps are interpreted.
#[derive(Debug, Clone, Default)]
pub struct TripLoad {
    pub records: Vec<TripRecord>,
    /// Rows that could not be decoded at all (wrong shape, bad quoting).
    pub rejected_rows: usize,
}

/// Abstraction over a dataset provider (e.g., the Bluebikes open data files).
#[async_trait::async_trait]
pub trait DatasetApi: Send + Sync {
    /// Returns the static station list.
    async fn stations(&self) -> Result<Vec<Station>>;

    /// Returns every trip row of the dataset.
    async fn trips(&self) -> Result<TripLoad>;
}
