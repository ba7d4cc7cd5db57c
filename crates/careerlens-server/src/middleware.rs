use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::api::ApiError;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Longest client-supplied request id that is echoed back.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID stored as a request extension by [`request_id`].
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Tags each request with an id and echoes it as `x-request-id`.
///
/// A client-supplied id is reused when it is short, visible ASCII; anything
/// else is replaced by a fresh `UUIDv4`.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| is_usable_request_id(v))
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(X_REQUEST_ID, value);
    }
    res
}

fn is_usable_request_id(raw: &str) -> bool {
    !raw.is_empty()
        && raw.len() <= MAX_REQUEST_ID_LEN
        && raw.bytes().all(|b| b.is_ascii_graphic())
}

/// Outcome of asking the quota for one more analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Granted,
    /// Over quota; the window reopens after the given delay.
    Rejected { retry_after: Duration },
}

#[derive(Debug)]
struct QuotaWindow {
    opened_at: Instant,
    used: usize,
}

/// Service-wide quota on analysis requests. Every analysis spends scraping
/// credits and assistant runs, so the window is shared by all clients.
#[derive(Debug, Clone)]
pub struct AnalysisQuota {
    limit: usize,
    window: Duration,
    state: Arc<Mutex<QuotaWindow>>,
}

impl AnalysisQuota {
    #[must_use]
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            state: Arc::new(Mutex::new(QuotaWindow {
                opened_at: Instant::now(),
                used: 0,
            })),
        }
    }

    #[must_use]
    pub fn per_minute(limit: usize) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    /// Counts one request observed at `now` against the quota.
    pub fn admit(&self, now: Instant) -> Admission {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let elapsed = now.saturating_duration_since(state.opened_at);
        if elapsed >= self.window {
            state.opened_at = now;
            state.used = 0;
        }

        if state.used >= self.limit {
            return Admission::Rejected {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }
        state.used += 1;
        Admission::Granted
    }
}

/// Rejects analysis requests over the quota with `429 rate_limited`.
pub async fn enforce_quota(
    State(quota): State<AnalysisQuota>,
    req: Request,
    next: Next,
) -> Response {
    let Admission::Rejected { retry_after } = quota.admit(Instant::now()) else {
        return next.run(req).await;
    };

    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map_or_else(|| Uuid::new_v4().to_string(), |id| id.0.clone());
    let secs = retry_after.as_secs().max(1);
    tracing::warn!(%request_id, retry_after_secs = secs, "analysis quota exhausted");

    let mut res = ApiError::new(
        request_id,
        "rate_limited",
        format!("analysis quota exhausted; retry in {secs}s"),
    )
    .into_response();
    res.headers_mut().insert(RETRY_AFTER, HeaderValue::from(secs));
    res
}
