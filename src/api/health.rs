use axum::response::Json;

use crate::types::StatusResponse;

pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}
