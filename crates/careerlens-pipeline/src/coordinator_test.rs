use std::sync::atomic::{AtomicU32, Ordering};

use careerlens_analysis::ScoreSet;
use serde_json::json;

use super::*;

// -----------------------------------------------------------------------
// Stubs
// -----------------------------------------------------------------------

struct StubSource {
    result: fn() -> Result<ScrapedProfile, ScraperError>,
    calls: AtomicU32,
}

impl StubSource {
    fn new(result: fn() -> Result<ScrapedProfile, ScraperError>) -> Self {
        Self {
            result,
            calls: AtomicU32::new(0),
        }
    }
}

impl ProfileSource for StubSource {
    async fn fetch_profile(&self, _profile_url: &str) -> Result<ScrapedProfile, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.result)()
    }
}

fn ana() -> Result<ScrapedProfile, ScraperError> {
    Ok(ScrapedProfile::new(json!([
        { "firstName": "Ana", "lastName": "Silva", "headline": "Dev", "location": "Recife" }
    ])))
}

fn exhausted() -> Result<ScrapedProfile, ScraperError> {
    Err(ScraperError::ProfileFetchExhausted {
        attempts: 3,
        last_error: Some(Box::new(ScraperError::NoCredentialsAvailable)),
    })
}

enum Analyzer {
    Structured(Value),
    Fallback,
    Fails,
    Panics,
    Hangs,
}

impl ProfileAnalyzer for Analyzer {
    async fn analyze_profile(
        &self,
        profile: &Value,
        objective: &ObjectiveTag,
    ) -> Result<AnalysisResult, AnalysisError> {
        match self {
            Self::Structured(v) => Ok(AnalysisResult::from_assistant(
                v.to_string(),
                "thread".to_owned(),
                "run".to_owned(),
                objective.clone(),
            )),
            Self::Fallback => Ok(AnalysisResult::fallback(
                careerlens_analysis::fallback_report(profile, objective),
                objective.clone(),
            )),
            Self::Fails => Err(AnalysisError::EmptyResponse),
            Self::Panics => panic!("analyzer blew up"),
            Self::Hangs => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(AnalysisError::EmptyResponse)
            }
        }
    }
}

fn coordinator(
    source: fn() -> Result<ScrapedProfile, ScraperError>,
    analyzer: Analyzer,
) -> RequestCoordinator<StubSource, Analyzer> {
    RequestCoordinator::new(StubSource::new(source), analyzer, Duration::from_secs(5))
}

// -----------------------------------------------------------------------
// fetch_and_analyze
// -----------------------------------------------------------------------

#[tokio::test]
async fn blank_url_is_rejected_before_fetching() {
    let c = coordinator(ana, Analyzer::Fallback);
    let err = c.fetch_and_analyze("   ", None).await.expect_err("blank url");
    assert!(matches!(err, PipelineError::Validation(_)));
    assert_eq!(c.source().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn structured_analysis_yields_complete_report_with_scores() {
    let c = coordinator(
        ana,
        Analyzer::Structured(json!({"Overall Grade": {"notaPerfil": 9, "notaTitulo": 8}})),
    );
    let outcome = c
        .fetch_and_analyze("https://www.linkedin.com/in/ana", Some("first_job"))
        .await
        .expect("report");

    let ReportOutcome::Complete(report) = outcome else {
        panic!("expected complete report");
    };
    assert_eq!(report.profile.name, "Ana Silva");
    assert_eq!(report.profile.location, "Recife");
    assert_eq!(report.objective, ObjectiveTag::FirstJob);
    assert!(report.is_structured_format);
    assert!(!report.partial);
    assert_eq!(
        report.scores,
        ScoreSet {
            profile_completeness: 9.0,
            headline_quality: 8.0,
            experience_details: 8.0,
            skills_relevance: 7.0,
            overall_impression: 9.0,
        }
    );
}

#[tokio::test]
async fn fallback_analysis_counts_as_full_success() {
    let c = coordinator(ana, Analyzer::Fallback);
    let outcome = c
        .fetch_and_analyze("https://www.linkedin.com/in/ana", None)
        .await
        .expect("report");

    let ReportOutcome::Complete(report) = outcome else {
        panic!("fallback must not be partial");
    };
    assert!(report.fallback);
    assert!(!report.is_structured_format);
    assert_eq!(report.objective.as_str(), "general");
    assert_eq!(report.scores, ScoreSet::default());
}

#[tokio::test]
async fn analyzer_error_yields_partial_report() {
    let c = coordinator(ana, Analyzer::Fails);
    let outcome = c
        .fetch_and_analyze("https://www.linkedin.com/in/ana", Some("international"))
        .await
        .expect("partial report");

    let ReportOutcome::Partial(report) = outcome else {
        panic!("expected partial report");
    };
    assert!(report.partial);
    assert_eq!(report.note_type, "warning");
    assert_eq!(report.profile.name, "Ana Silva");
    assert_eq!(report.profile_data[0]["headline"], "Dev");
    assert!(report.error.contains("no text response"), "{}", report.error);
}

#[tokio::test]
async fn analyzer_panic_is_contained_as_partial() {
    let c = coordinator(ana, Analyzer::Panics);
    let outcome = c
        .fetch_and_analyze("https://www.linkedin.com/in/ana", None)
        .await
        .expect("partial report");
    assert!(outcome.is_partial());
}

#[tokio::test]
async fn fetch_failure_is_fatal() {
    let c = coordinator(exhausted, Analyzer::Fallback);
    let err = c
        .fetch_and_analyze("https://www.linkedin.com/in/ana", None)
        .await
        .expect_err("fetch fails");
    assert!(matches!(
        err,
        PipelineError::ProfileFetch(ScraperError::ProfileFetchExhausted { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn whole_request_is_bounded_by_timeout() {
    let c = RequestCoordinator::new(StubSource::new(ana), Analyzer::Hangs, Duration::from_secs(600));
    let err = c
        .fetch_and_analyze("https://www.linkedin.com/in/ana", None)
        .await
        .expect_err("times out");
    assert!(matches!(err, PipelineError::Timeout { secs: 600 }));
}
