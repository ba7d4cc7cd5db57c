use axum::{response::IntoResponse, Extension, Json};

use careerlens_core::{ObjectiveInfo, OBJECTIVE_CATALOG};

use super::{ApiResponse, ResponseMeta};
use crate::middleware::RequestId;

pub(super) async fn list_objectives(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse::<&[ObjectiveInfo]> {
        data: OBJECTIVE_CATALOG,
        meta: ResponseMeta::new(req_id.0),
    })
}
