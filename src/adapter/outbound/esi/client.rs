//! ESI REST client.
//!
//! Station regions are resolved station -> solar system -> constellation ->
//! region. Region order books are filtered server-side by item type and
//! client-side by station. Structure books need a bearer token and are
//! paged; every page is read before the book is returned.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use super::dto::{ConstellationDto, MarketOrderDto, StationDto, SystemDto};
use super::settings::EsiConfig;
use crate::domain::{
    CharacterId, CompetitorListing, RegionId, StationId, StationRegion, TypeId, TypedListing,
};
use crate::error::{Error, Result};
use crate::port::MarketDataSource;

const PAGES_HEADER: &str = "x-pages";

/// One page of a paged ESI response.
struct Page<T> {
    body: T,
    pages: u32,
}

/// HTTP client for the public and authenticated ESI market endpoints.
pub struct EsiClient {
    http: HttpClient,
    base_url: Url,
    datasource: String,
    access_token: Option<String>,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl EsiClient {
    pub fn from_config(config: &EsiConfig) -> Result<Self> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        let http = HttpClient::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Ok(Self {
            http,
            base_url: Url::parse(&base)?,
            datasource: config.datasource.clone(),
            access_token: config.access_token.clone(),
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("datasource", &self.datasource);
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_with_retry<T>(&self, url: &Url, bearer: Option<&str>) -> Result<Page<T>>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let mut request = self.http.get(url.clone());
            if let Some(token) = bearer {
                request = request.header(AUTHORIZATION, format!("Bearer {token}"));
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let response = match response.error_for_status() {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let pages = page_count(response.headers());
            match response.json::<T>().await {
                Ok(body) => return Ok(Page { body, pages }),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    /// Transient failures: timeouts, refused connections and ESI's own
    /// 502/503/504 responses.
    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout()
            || err.is_connect()
            || err.status().is_some_and(|s| s.is_server_error())
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "HTTP request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }

    /// Read every page of a paged endpoint.
    async fn get_all_pages<T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        bearer: Option<&str>,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let first: Page<Vec<T>> = self.get_with_retry(&self.endpoint(path, query)?, bearer).await?;
        let mut items = first.body;

        for page in 2..=first.pages {
            let mut paged = query.to_vec();
            paged.push(("page", page.to_string()));
            let next: Page<Vec<T>> = self
                .get_with_retry(&self.endpoint(path, &paged)?, bearer)
                .await?;
            items.extend(next.body);
        }

        debug!(path, pages = first.pages, items = items.len(), "Fetched paged resource");
        Ok(items)
    }

    async fn resolve_station(&self, station: StationId) -> Result<StationRegion> {
        let url = self.endpoint(&format!("universe/stations/{station}/"), &[])?;
        let station_dto: StationDto = self.get_with_retry(&url, None).await?.body;

        let url = self.endpoint(&format!("universe/systems/{}/", station_dto.system_id), &[])?;
        let system: SystemDto = self.get_with_retry(&url, None).await?.body;

        let url = self.endpoint(
            &format!("universe/constellations/{}/", system.constellation_id),
            &[],
        )?;
        let constellation: ConstellationDto = self.get_with_retry(&url, None).await?.body;

        Ok(StationRegion {
            station_id: station,
            name: station_dto.name,
            region_id: RegionId::new(constellation.region_id),
        })
    }
}

fn page_count(headers: &HeaderMap) -> u32 {
    headers
        .get(PAGES_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(1)
}

#[async_trait]
impl MarketDataSource for EsiClient {
    async fn resolve_station_regions(
        &self,
        stations: &[StationId],
    ) -> Result<HashMap<StationId, StationRegion>> {
        let lookups = stations.iter().map(|&station| async move {
            (station, self.resolve_station(station).await)
        });

        let mut resolved = HashMap::new();
        for (station, outcome) in join_all(lookups).await {
            match outcome {
                Ok(region) => {
                    resolved.insert(station, region);
                }
                Err(e) => {
                    warn!(station_id = %station, error = %e, "Could not resolve station region");
                }
            }
        }

        info!(requested = stations.len(), resolved = resolved.len(), "Resolved station regions");
        Ok(resolved)
    }

    async fn fetch_region_station_sell_listings(
        &self,
        region: RegionId,
        station: StationId,
        type_id: TypeId,
    ) -> Result<Vec<CompetitorListing>> {
        let orders: Vec<MarketOrderDto> = self
            .get_all_pages(
                &format!("markets/{region}/orders/"),
                &[("order_type", "sell".into()), ("type_id", type_id.to_string())],
                None,
            )
            .await?;

        Ok(orders
            .iter()
            .filter(|o| !o.is_buy_order && o.location() == station)
            .filter_map(MarketOrderDto::listing)
            .collect())
    }

    async fn fetch_structure_sell_listings(
        &self,
        structure: StationId,
        auth_character: CharacterId,
    ) -> Result<Vec<TypedListing>> {
        let token = self.access_token.as_deref().ok_or_else(|| {
            Error::Collaborator(format!(
                "no access token for character {auth_character} to read structure {structure}"
            ))
        })?;

        let orders: Vec<MarketOrderDto> = self
            .get_all_pages(&format!("markets/structures/{structure}/"), &[], Some(token))
            .await?;

        Ok(orders
            .iter()
            .filter(|o| !o.is_buy_order)
            .filter_map(MarketOrderDto::typed_listing)
            .collect())
    }
}
