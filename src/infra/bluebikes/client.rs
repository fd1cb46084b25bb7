use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::config::SourceConfig;
use crate::fetch::{BasicClient, HttpClient, fetch_source};
use crate::parser::{parse_stations, parse_trips};
use crate::services::dataset_api::{DatasetApi, TripLoad};
use crate::traffic::types::Station;

/// Reads the station JSON and trip CSV named by a [`SourceConfig`].
pub struct BluebikesClient<C = BasicClient> {
    http: C,
    sources: SourceConfig,
}

impl BluebikesClient {
    pub fn new(sources: SourceConfig) -> Self {
        Self::with_client(BasicClient::new(), sources)
    }
}

impl<C: HttpClient> BluebikesClient<C> {
    pub fn with_client(http: C, sources: SourceConfig) -> Self {
        Self { http, sources }
    }

    pub fn sources(&self) -> &SourceConfig {
        &self.sources
    }
}

#[async_trait]
impl<C: HttpClient> DatasetApi for BluebikesClient<C> {
    async fn stations(&self) -> Result<Vec<Station>> {
        let bytes = fetch_source(&self.http, &self.sources.stations).await?;
        let stations = parse_stations(&bytes)?;
        info!(source = %self.sources.stations, count = stations.len(), "Station metadata parsed");
        Ok(stations)
    }

    async fn trips(&self) -> Result<TripLoad> {
        let bytes = fetch_source(&self.http, &self.sources.trips).await?;
        let load = parse_trips(bytes.as_slice())?;
        info!(
            source = %self.sources.trips,
            rows = load.records.len(),
            rejected = load.rejected_rows,
            "Trip rows parsed"
        );
        Ok(load)
    }
}
