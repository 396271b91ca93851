use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, Url};

use super::query::PackageQuery;
use super::types::{PackageId, PackagePage};
use crate::http::check_status;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// The admin endpoints this console talks to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_packages(&self, query: &PackageQuery) -> Result<PackagePage>;
    async fn approve_package(&self, id: &PackageId) -> Result<()>;
    async fn feature_package(&self, id: &PackageId) -> Result<()>;
    async fn delete_package(&self, id: &PackageId) -> Result<()>;
    fn api_url(&self) -> &str;
}

pub struct AdminClient {
    pub client: Client,
    pub api_url: String,
}

impl AdminClient {
    #[tracing::instrument(skip(client, api_url))]
    pub fn new(client: Client, api_url: Option<String>) -> Self {
        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self { client, api_url }
    }

    /// `{api_url}/api/packages[/{id}][/{action}]`, each segment encoded.
    fn packages_url(&self, id: Option<&PackageId>, action: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .with_context(|| format!("Invalid API URL: {}", self.api_url))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("API URL cannot be a base: {}", self.api_url))?;
            segments.pop_if_empty().extend(["api", "packages"]);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
            if let Some(action) = action {
                segments.push(action);
            }
        }
        Ok(url)
    }

    async fn send_mutation(&self, method: Method, url: Url) -> Result<()> {
        debug!("{} {}...", method, url);

        let response = self
            .client
            .request(method, url)
            .send()
            .await
            .context("Failed to send request to admin API")?;

        response.error_for_status().map_err(check_status)?;
        Ok(())
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    #[tracing::instrument(skip(self))]
    async fn list_packages(&self, query: &PackageQuery) -> Result<PackagePage> {
        let url = self.packages_url(None, None)?;
        let params = query.params();

        debug!("Fetching packages from {} with query {:?}...", url, params);

        let response = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .context("Failed to send request to admin API")?;

        let body: serde_json::Value = response
            .error_for_status()
            .map_err(check_status)?
            .json()
            .await
            .context("Failed to parse JSON response from admin API")?;

        let page = PackagePage::from_body(body);
        debug!("Fetched {} package(s)", page.packages.len());
        Ok(page)
    }

    #[tracing::instrument(skip(self))]
    async fn approve_package(&self, id: &PackageId) -> Result<()> {
        let url = self.packages_url(Some(id), Some("approve"))?;
        self.send_mutation(Method::PUT, url).await
    }

    #[tracing::instrument(skip(self))]
    async fn feature_package(&self, id: &PackageId) -> Result<()> {
        let url = self.packages_url(Some(id), Some("feature"))?;
        self.send_mutation(Method::PUT, url).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_package(&self, id: &PackageId) -> Result<()> {
        let url = self.packages_url(Some(id), None)?;
        self.send_mutation(Method::DELETE, url).await
    }

    fn api_url(&self) -> &str {
        &self.api_url
    }
}
