//! Request orchestration: fetch, summarize, analyze, score.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::task::AbortHandle;

use careerlens_analysis::{
    extract_scores, AnalysisConfig, AnalysisEngine, AnalysisError, AnalysisResult,
};
use careerlens_core::{AppConfig, ObjectiveTag};
use careerlens_scraper::{
    summarize, CredentialSource, CredentialStoreConfig, ProfileFetcher, ScrapedProfile,
    ScraperConfig, ScraperError,
};

use crate::error::PipelineError;
use crate::report::{FinalReport, PartialReport, ReportOutcome};

/// Where profiles come from.
pub trait ProfileSource: Send + Sync + 'static {
    fn fetch_profile(
        &self,
        profile_url: &str,
    ) -> impl Future<Output = Result<ScrapedProfile, ScraperError>> + Send;
}

/// What analyzes them.
pub trait ProfileAnalyzer: Send + Sync + 'static {
    fn analyze_profile(
        &self,
        profile: &Value,
        objective: &ObjectiveTag,
    ) -> impl Future<Output = Result<AnalysisResult, AnalysisError>> + Send;
}

impl ProfileSource for ProfileFetcher {
    async fn fetch_profile(&self, profile_url: &str) -> Result<ScrapedProfile, ScraperError> {
        self.fetch(profile_url).await
    }
}

impl ProfileAnalyzer for AnalysisEngine {
    async fn analyze_profile(
        &self,
        profile: &Value,
        objective: &ObjectiveTag,
    ) -> Result<AnalysisResult, AnalysisError> {
        Ok(self.analyze(profile, objective).await)
    }
}

/// Aborts the wrapped task when dropped, so a timed-out request does not
/// leave its analysis running.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

pub struct RequestCoordinator<S, A> {
    source: S,
    analyzer: Arc<A>,
    request_timeout: Duration,
}

impl RequestCoordinator<ProfileFetcher, AnalysisEngine> {
    /// Wires the production fetcher and engine from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ScraperSetup`] or
    /// [`PipelineError::AnalysisSetup`] if an HTTP client cannot be built.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let credentials = CredentialSource::from_config(&CredentialStoreConfig::from_app_config(config))
            .map_err(PipelineError::ScraperSetup)?;
        let fetcher = ProfileFetcher::new(ScraperConfig::from_app_config(config), credentials)
            .map_err(PipelineError::ScraperSetup)?;
        let engine = AnalysisEngine::new(AnalysisConfig::from_app_config(config))
            .map_err(PipelineError::AnalysisSetup)?;
        Ok(Self::new(
            fetcher,
            engine,
            Duration::from_secs(config.request_timeout_secs),
        ))
    }
}

impl<S: ProfileSource, A: ProfileAnalyzer> RequestCoordinator<S, A> {
    #[must_use]
    pub fn new(source: S, analyzer: A, request_timeout: Duration) -> Self {
        Self {
            source,
            analyzer: Arc::new(analyzer),
            request_timeout,
        }
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches `profile_url`, analyzes it for `objective` and assembles the
    /// report.
    ///
    /// A failed analysis step yields [`ReportOutcome::Partial`] rather than an
    /// error. A fallback analysis is a normal [`ReportOutcome::Complete`].
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Validation`] when `profile_url` is blank.
    /// - [`PipelineError::ProfileFetch`] when no profile could be fetched.
    /// - [`PipelineError::Timeout`] when the whole flow overruns the request
    ///   timeout.
    pub async fn fetch_and_analyze(
        &self,
        profile_url: &str,
        objective: Option<&str>,
    ) -> Result<ReportOutcome, PipelineError> {
        let profile_url = profile_url.trim();
        if profile_url.is_empty() {
            return Err(PipelineError::Validation(
                "profile_url is required".to_owned(),
            ));
        }
        let objective = objective.map(ObjectiveTag::parse).unwrap_or_default();

        tokio::time::timeout(self.request_timeout, self.run(profile_url, objective))
            .await
            .map_err(|_| {
                tracing::warn!(
                    profile_url,
                    timeout_secs = self.request_timeout.as_secs(),
                    "request timed out"
                );
                PipelineError::Timeout {
                    secs: self.request_timeout.as_secs(),
                }
            })?
    }

    async fn run(
        &self,
        profile_url: &str,
        objective: ObjectiveTag,
    ) -> Result<ReportOutcome, PipelineError> {
        tracing::info!(profile_url, objective = %objective, "fetching profile");
        let profile = self
            .source
            .fetch_profile(profile_url)
            .await
            .map_err(PipelineError::ProfileFetch)?;
        let profile_data = profile.into_value();
        let summary = summarize(&profile_data, profile_url);

        tracing::info!(name = %summary.name, "profile fetched; starting analysis");
        let analysis = match self.analyze_isolated(&profile_data, &objective).await {
            Ok(analysis) => analysis,
            Err(message) => {
                tracing::warn!(error = %message, "analysis failed; returning partial report");
                return Ok(ReportOutcome::Partial(PartialReport::new(
                    summary,
                    objective,
                    profile_data,
                    message,
                )));
            }
        };

        let scores = extract_scores(&analysis);
        Ok(ReportOutcome::Complete(FinalReport::new(
            summary, analysis, scores,
        )))
    }

    /// Runs the analyzer on its own task so that a panic is contained and
    /// reported like an error.
    async fn analyze_isolated(
        &self,
        profile: &Value,
        objective: &ObjectiveTag,
    ) -> Result<AnalysisResult, String> {
        let analyzer = Arc::clone(&self.analyzer);
        let profile = profile.clone();
        let objective = objective.clone();

        let handle =
            tokio::spawn(async move { analyzer.analyze_profile(&profile, &objective).await });
        let _guard = AbortOnDrop(handle.abort_handle());

        match handle.await {
            Ok(Ok(analysis)) => Ok(analysis),
            Ok(Err(e)) => Err(e.to_string()),
            Err(join) if join.is_panic() => Err("analysis task panicked".to_owned()),
            Err(join) => Err(format!("analysis task did not finish: {join}")),
        }
    }
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;
