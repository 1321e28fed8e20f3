use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::StatementList;

/// Public Sejm open-data API
pub const DEFAULT_BASE_URL: &str = "https://api.sejm.gov.pl/sejm";

/// Configuration for the Sejm API client
#[derive(Debug, Clone)]
pub struct SejmConfig {
    /// API root (from SEJM_API_URL, defaults to [`DEFAULT_BASE_URL`])
    pub base_url: String,
}

impl SejmConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SEJM_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Absolute URL of an API path
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for SejmConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// A parliamentary term
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    pub num: u32,
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
}

/// A proceeding (posiedzenie) with its sitting days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proceeding {
    pub number: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub dates: Vec<String>,
}

pub fn proceedings_path(term: u32) -> String {
    format!("term{term}/proceedings")
}

pub fn transcripts_path(term: u32, proceeding: u32, date: &str) -> String {
    format!("term{term}/proceedings/{proceeding}/{date}/transcripts")
}

pub fn deputies_path(term: u32) -> String {
    format!("term{term}/MP")
}

/// Sejm API client
pub struct SejmClient {
    client: Client,
    config: SejmConfig,
}

impl SejmClient {
    pub fn new(config: SejmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &SejmConfig {
        &self.config
    }

    /// All terms of office
    pub async fn terms(&self) -> Result<Vec<Term>> {
        self.get_json("term").await
    }

    pub async fn proceedings(&self, term: u32) -> Result<Vec<Proceeding>> {
        self.get_json(&proceedings_path(term)).await
    }

    pub async fn statements(&self, term: u32, proceeding: u32, date: &str) -> Result<StatementList> {
        self.get_json(&transcripts_path(term, proceeding, date)).await
    }

    /// Deputies of a term as raw JSON objects
    pub async fn deputies(&self, term: u32) -> Result<Vec<serde_json::Value>> {
        self.get_json(&deputies_path(term)).await
    }

    /// HTML of one statement; `None` when the API has no such statement
    pub async fn statement_html(
        &self,
        term: u32,
        proceeding: u32,
        date: &str,
        statement: u32,
    ) -> Result<Option<String>> {
        let path = format!("{}/{}", transcripts_path(term, proceeding, date), statement);
        match self.get_optional(&path).await? {
            Some(response) => Ok(Some(
                response.text().await.context("Failed to read statement HTML")?,
            )),
            None => Ok(None),
        }
    }

    /// PDF transcript of a sitting day; `None` on a non-success status
    pub async fn transcript_pdf(&self, term: u32, proceeding: u32, date: &str) -> Result<Option<Vec<u8>>> {
        let path = format!("{}/pdf", transcripts_path(term, proceeding, date));
        match self.get_optional(&path).await? {
            Some(response) => {
                let bytes = response.bytes().await.context("Failed to read transcript PDF")?;
                Ok(Some(bytes.to_vec()))
            }
            None => Ok(None),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Sejm API error for {}: {} - {}", url, status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse Sejm API response from {}", url))
    }

    async fn get_optional(&self, path: &str) -> Result<Option<Response>> {
        let url = self.config.url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if response.status().is_success() {
            Ok(Some(response))
        } else {
            debug!("{} returned {}", url, response.status());
            Ok(None)
        }
    }
}
