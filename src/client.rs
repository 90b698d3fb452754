//! Analytics client facade
//!
//! Wires configuration, token provider and transport together and exposes
//! the two report entry points: a single-dimension paged report and the
//! multi-dimension breakdown expansion.

use crate::auth::TokenProvider;
use crate::breakdown::BreakdownExpander;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::loader::ReportDefinition;
use crate::output::ReportTable;
use crate::pagination::ReportPager;
use crate::report::ReportRequest;
use std::sync::Arc;
use tracing::info;

/// Client for one Analytics company
pub struct AnalyticsClient {
    config: ClientConfig,
    http: HttpClient,
    token_provider: Option<Arc<TokenProvider>>,
    pager: ReportPager,
}

impl AnalyticsClient {
    /// Create a client from credentials
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http_config = HttpClientConfig::builder()
            .header("X-Api-Key", &config.client_id)
            .header("x-proxy-global-company-id", &config.company_id)
            .header("Accept", "application/json")
            .build();

        let provider = Arc::new(TokenProvider::new(config.clone()));
        let http = HttpClient::with_token_provider(http_config, Arc::clone(&provider));
        let pager = ReportPager::new(config.reports_url());

        Ok(Self {
            config,
            http,
            token_provider: Some(provider),
            pager,
        })
    }

    /// Create a client over a pre-built transport; no token provider attached
    pub fn with_http(config: ClientConfig, http: HttpClient) -> Self {
        let pager = ReportPager::new(config.reports_url());
        Self {
            config,
            http,
            token_provider: None,
            pager,
        }
    }

    /// The client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Verify credentials by acquiring an access token
    pub async fn check(&self) -> Result<()> {
        let provider = self
            .token_provider
            .as_ref()
            .ok_or_else(|| Error::auth("no token provider configured"))?;
        provider.bearer_token().await?;
        Ok(())
    }

    /// Run a single-dimension report, fetching every page
    pub async fn run_report(&self, request: &ReportRequest) -> Result<ReportTable> {
        let paged = self.pager.fetch_all(&self.http, request).await?;
        info!(
            dimension = %request.dimension,
            pages = paged.state.pages_fetched,
            rows = paged.row_count(),
            "report complete"
        );
        Ok(ReportTable::from_paged(request, &paged))
    }

    /// Run a report across an ordered dimension list
    ///
    /// A single dimension degrades to a plain paged report; more than one
    /// triggers breakdown expansion.
    pub async fn run_breakdown_report(
        &self,
        base: &ReportRequest,
        dimensions: &[String],
    ) -> Result<ReportTable> {
        if dimensions.len() == 1 {
            let mut request = base.clone();
            request.dimension = dimensions[0].clone();
            return self.run_report(&request).await;
        }

        let expander = BreakdownExpander::new(
            base.clone(),
            dimensions.to_vec(),
            self.config.reports_url(),
        )?;
        expander.run(&self.http).await
    }

    /// Run a loaded report definition
    pub async fn run_definition(&self, definition: &ReportDefinition) -> Result<ReportTable> {
        let request = definition.to_request();
        if definition.has_breakdowns() {
            self.run_breakdown_report(&request, &definition.dimensions)
                .await
        } else {
            self.run_report(&request).await
        }
    }
}

impl std::fmt::Debug for AnalyticsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsClient")
            .field("config", &self.config)
            .field("has_token_provider", &self.token_provider.is_some())
            .finish_non_exhaustive()
    }
}
