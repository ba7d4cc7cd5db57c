use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use careerlens_pipeline::{PipelineError, ProfileAnalyzer, ProfileSource, ReportOutcome};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

const FETCH_FAILED_MESSAGE: &str =
    "Could not access the LinkedIn profile after several attempts. Please contact support.";

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    #[serde(default, alias = "profileUrl")]
    profile_url: Option<String>,
    #[serde(default)]
    objective: Option<String>,
}

pub(super) async fn analyze_profile<S: ProfileSource, A: ProfileAnalyzer>(
    State(state): State<AppState<S, A>>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            return ApiError::new(req_id.0, "validation_error", rejection.body_text())
                .into_response();
        }
    };

    let profile_url = request.profile_url.unwrap_or_default();
    let outcome = state
        .coordinator
        .fetch_and_analyze(&profile_url, request.objective.as_deref())
        .await;

    match outcome {
        Ok(ReportOutcome::Complete(report)) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: report,
                meta: ResponseMeta::new(req_id.0),
            }),
        )
            .into_response(),
        Ok(ReportOutcome::Partial(report)) => (
            StatusCode::MULTI_STATUS,
            Json(ApiResponse {
                data: report,
                meta: ResponseMeta::new(req_id.0),
            }),
        )
            .into_response(),
        Err(e) => map_pipeline_error(req_id.0, &e).into_response(),
    }
}

fn map_pipeline_error(request_id: String, error: &PipelineError) -> ApiError {
    match error {
        PipelineError::Validation(message) => {
            ApiError::new(request_id, "validation_error", message.clone())
        }
        PipelineError::ProfileFetch(source) => {
            tracing::error!(error = %source, "profile fetch exhausted");
            let mut details = json!({ "error": source.root_message() });
            if let Some((status, body)) = source.provider_details() {
                details["provider_status"] = json!(status);
                details["provider_error"] = body.clone();
            }
            ApiError::new(request_id, "profile_fetch_failed", FETCH_FAILED_MESSAGE)
                .with_contact_support()
                .with_details(details)
        }
        PipelineError::Timeout { .. } => {
            ApiError::new(request_id, "timeout", error.to_string())
        }
        PipelineError::ScraperSetup(_) | PipelineError::AnalysisSetup(_) => {
            tracing::error!(error = %error, "pipeline misconfigured");
            ApiError::new(request_id, "internal_error", "internal error")
        }
    }
}
