use std::time::Duration;

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::Snapshot;

/// Thin typed wrapper over the scraper backend's REST endpoints.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

/// `GET /scrape` wraps the new snapshot as `scraped` or, on older backends, `data`.
#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    scraped: Option<Snapshot>,
    data: Option<Snapshot>,
    id: Option<String>,
}

impl BackendClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()?;
        Ok(Self::with_client(http, cfg.backend_url.clone()))
    }

    pub fn with_client(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /data`: every stored snapshot, in the order the backend returns them.
    pub async fn list_snapshots(&self) -> Result<Vec<Snapshot>> {
        let snapshots: Vec<Snapshot> = self.get_json("/data").await?;
        info!(count = snapshots.len(), "fetched snapshot list");
        Ok(snapshots)
    }

    /// `GET /scrape`: runs a scrape on the backend and returns the stored snapshot.
    pub async fn scrape(&self) -> Result<Snapshot> {
        let body: ScrapeResponse = self.get_json("/scrape").await?;
        let mut snapshot = body
            .scraped
            .or(body.data)
            .ok_or_else(|| AppError::Backend("scrape response carried no snapshot".to_string()))?;
        if snapshot.id.is_empty() {
            if let Some(id) = body.id {
                snapshot.id = id;
            }
        }
        info!(id = %snapshot.id, rows = snapshot.data.len(), scraped_at = %snapshot.scraped_at_cst, "scrape complete");
        Ok(snapshot)
    }

    /// `DELETE /data/{id}`
    pub async fn delete_snapshot(&self, id: &str) -> Result<()> {
        self.send(Method::DELETE, &format!("/data/{id}")).await?;
        info!(id, "snapshot deleted");
        Ok(())
    }

    /// Clear every snapshot, trying `DELETE /data/clear`, then `DELETE /data`,
    /// then `POST /data/clear`. Fails only when all three fail.
    pub async fn clear_all(&self) -> Result<()> {
        let attempts = [
            (Method::DELETE, "/data/clear"),
            (Method::DELETE, "/data"),
            (Method::POST, "/data/clear"),
        ];

        let mut failures = Vec::with_capacity(attempts.len());
        for (method, path) in attempts {
            match self.send(method.clone(), path).await {
                Ok(_) => {
                    info!(%method, path, "cleared all snapshots");
                    return Ok(());
                }
                Err(e) => {
                    warn!(%method, path, error = %e, "clear endpoint failed, trying next");
                    failures.push(format!("{method} {path}: {e}"));
                }
            }
        }
        Err(AppError::ClearFailed(failures.join("; ")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.send(Method::GET, path).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send(&self, method: Method, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "backend request");
        let resp = self.http.request(method, &url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Backend(format!("{url} returned {status}")));
        }
        Ok(resp)
    }
}
